// In-memory `UserBackend` shared by the test suites.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use userlist_manager::api::{User, UserBackend, UserDraft, UserPatch};
use userlist_manager::error::{Result, simple_error};

pub const NAMES: [&str; 10] = [
    "Leanne Graham",
    "Ervin Howell",
    "Clementine Bauch",
    "Patricia Lebsack",
    "Chelsey Dietrich",
    "Mrs. Dennis Schulist",
    "Kurtis Weissnat",
    "Nicholas Runolfsdottir V",
    "Glenna Reichert",
    "Clementina DuBuque",
];

/// `n` users with ids `1..=n`, cycling through `NAMES`.
pub fn sample_users(n: usize) -> Vec<User> {
    (0..n)
        .map(|i| {
            let id = i as u64 + 1;
            User::new(
                id,
                NAMES[i % NAMES.len()],
                format!("user{id}@example.org"),
                format!("555-01{id:02}"),
            )
        })
        .collect()
}

pub struct FakeBackend {
    pub users: Vec<User>,
    /// Id the fake service assigns to created users.
    pub created_id: u64,
    pub fail: Cell<bool>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            created_id: 11,
            fail: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(users: Vec<User>) -> Self {
        let api = Self::new(users);
        api.fail.set(true);
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.fail.get() {
            Err(simple_error("service unavailable"))
        } else {
            Ok(())
        }
    }
}

impl UserBackend for FakeBackend {
    fn list_users(&self) -> Result<Vec<User>> {
        self.record("GET /users".to_string())?;
        Ok(self.users.clone())
    }

    fn create_user(&self, draft: &UserDraft) -> Result<User> {
        self.record("POST /users".to_string())?;
        Ok(User::new(
            self.created_id,
            draft.name.clone(),
            draft.email.clone(),
            draft.phone.clone(),
        ))
    }

    fn update_user(&self, id: u64, draft: &UserDraft) -> Result<UserPatch> {
        self.record(format!("PUT /users/{id}"))?;
        Ok(UserPatch {
            id: Some(id),
            name: Some(draft.name.clone()),
            email: Some(draft.email.clone()),
            phone: Some(draft.phone.clone()),
            ..Default::default()
        })
    }

    fn delete_user(&self, id: u64) -> Result<()> {
        self.record(format!("DELETE /users/{id}"))
    }
}
