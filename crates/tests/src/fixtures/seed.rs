use bson::oid::ObjectId;
use cohort_db::models::UserRole;

use super::test_app::TestApp;

pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
}

impl SeededUser {
    pub fn object_id(&self) -> ObjectId {
        ObjectId::parse_str(&self.id).unwrap()
    }
}

/// An admin, two students and a session linked to a meeting.
pub struct SeededCohort {
    pub admin: SeededUser,
    pub ada: SeededUser,
    pub bob: SeededUser,
    pub session_id: String,
    pub meeting_id: String,
}

impl TestApp {
    /// Insert a user directly and mint a token for them.
    pub async fn seed_user(&self, email: &str, display_name: &str, role: UserRole) -> SeededUser {
        let user = self
            .users
            .create(email, display_name.to_string(), role)
            .await
            .expect("Failed to create user");
        let id = user.id.unwrap();
        let access_token = self
            .auth
            .issue_access_token(id, &user.email)
            .expect("Failed to issue token");

        SeededUser {
            id: id.to_hex(),
            email: user.email,
            access_token,
        }
    }

    pub async fn seed_session(
        &self,
        title: &str,
        meeting_id: Option<&str>,
        scheduled_minutes: Option<u32>,
    ) -> String {
        let session = self
            .sessions
            .create(
                title.to_string(),
                meeting_id.map(str::to_string),
                None,
                scheduled_minutes,
            )
            .await
            .expect("Failed to create session");
        session.id.unwrap().to_hex()
    }

    pub async fn seed_cohort(&self, slug: &str, scheduled_minutes: Option<u32>) -> SeededCohort {
        let admin = self
            .seed_user(&format!("admin@{}.test", slug), "Admin", UserRole::Admin)
            .await;
        let ada = self
            .seed_user(&format!("ada@{}.test", slug), "Ada Lovelace", UserRole::Student)
            .await;
        let bob = self
            .seed_user(&format!("bob@{}.test", slug), "Bob Babbage", UserRole::Student)
            .await;
        let meeting_id = format!("{}-meeting", slug);
        let session_id = self
            .seed_session("Week 1", Some(&meeting_id), scheduled_minutes)
            .await;

        SeededCohort {
            admin,
            ada,
            bob,
            session_id,
            meeting_id,
        }
    }

    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }
}
