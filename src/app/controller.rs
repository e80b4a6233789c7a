//! In-memory mirror of the remote user collection.
//!
//! [`UserListController`] holds the full collection, the search string, the
//! current page and the create/edit form. Remote calls go through a
//! [`UserBackend`] passed in by the caller; local state only changes after a
//! call succeeds.

use tracing::{error, info, warn};

use crate::api::{User, UserBackend, UserDraft};
use crate::error::{Result, simple_error};
use crate::search::{filter_by_name, page_slice, total_pages};

/// Rows shown per page.
pub const PAGE_SIZE: usize = 5;

/// Marker shown in place of rows when the search matches nobody.
pub const NO_USERS_FOUND: &str = "No users found";

/// Field of the create/edit form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Phone];

    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Phone,
            FormField::Phone => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Phone,
            FormField::Email => FormField::Name,
            FormField::Phone => FormField::Email,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
        }
    }
}

/// Pending values of the create/edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl FormState {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.phone.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
        }
    }

    /// Check required fields and build the request body.
    ///
    /// All fields must be non-blank and the email needs a non-empty local
    /// part and domain around a single `@`.
    pub fn validate(&self) -> Result<UserDraft> {
        for field in FormField::ALL {
            if self.field(field).trim().is_empty() {
                return Err(simple_error(format!("{} is required", field.label())));
            }
        }
        let email = self.email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        };
        if !valid_email {
            return Err(simple_error(format!("'{email}' is not a valid email")));
        }
        Ok(UserDraft {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            phone: self.phone.trim().to_string(),
        })
    }
}

/// Result of a successful submit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(u64),
    Updated(u64),
}

/// The filtered, paginated rows to display.
#[derive(Clone, Debug)]
pub struct UserView<'a> {
    pub rows: Vec<&'a User>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

impl UserView<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `Some(NO_USERS_FOUND)` when nothing matches the search.
    pub fn marker(&self) -> Option<&'static str> {
        (self.filtered_count == 0).then_some(NO_USERS_FOUND)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Clone, Debug)]
pub struct UserListController {
    users: Vec<User>,
    search: String,
    page: usize,
    page_size: usize,
    editing: Option<User>,
    pub form: FormState,
}

impl Default for UserListController {
    fn default() -> Self {
        Self::new()
    }
}

impl UserListController {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            search: String::new(),
            page: 1,
            page_size: PAGE_SIZE,
            editing: None,
            form: FormState::default(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn editing(&self) -> Option<&User> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Replace the local collection with the remote one.
    pub fn load_all(&mut self, api: &dyn UserBackend) -> Result<usize> {
        match api.list_users() {
            Ok(users) => {
                let count = users.len();
                self.users = users;
                self.clamp_page();
                info!(count, "loaded users");
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "failed to fetch users");
                Err(e)
            }
        }
    }

    /// Create a user from the form, or update the user being edited.
    pub fn submit(&mut self, api: &dyn UserBackend) -> Result<SubmitOutcome> {
        let draft = match self.form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "form rejected");
                return Err(e);
            }
        };

        let outcome = match self.editing.as_ref().map(|u| u.id) {
            Some(id) => {
                let patch = api.update_user(id, &draft).map_err(|e| {
                    error!(id, error = %e, "failed to update user");
                    e
                })?;
                let mut matched = 0usize;
                for user in self.users.iter_mut().filter(|u| u.id == id) {
                    user.apply_patch(patch.clone());
                    matched += 1;
                }
                if matched == 0 {
                    warn!(id, "updated user is no longer in the local collection");
                }
                self.editing = None;
                self.clamp_page();
                info!(id, "updated user");
                SubmitOutcome::Updated(id)
            }
            None => {
                let user = api.create_user(&draft).map_err(|e| {
                    error!(name = %draft.name, error = %e, "failed to create user");
                    e
                })?;
                let id = user.id;
                if self.users.iter().any(|u| u.id == id) {
                    warn!(id, "service returned an id already present locally");
                }
                self.users.push(user);
                self.clamp_page();
                info!(id, "created user");
                SubmitOutcome::Created(id)
            }
        };

        self.form.clear();
        Ok(outcome)
    }

    /// Delete a user remotely, then drop it from the local collection.
    pub fn remove(&mut self, api: &dyn UserBackend, id: u64) -> Result<()> {
        if let Err(e) = api.delete_user(id) {
            error!(id, error = %e, "failed to delete user");
            return Err(e);
        }
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.clamp_page();
        info!(id, removed = before - self.users.len(), "deleted user");
        Ok(())
    }

    pub fn begin_edit(&mut self, user: &User) {
        self.form = FormState::from_user(user);
        self.editing = Some(user.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form.clear();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = 1;
    }

    pub fn filtered(&self) -> Vec<&User> {
        filter_by_name(&self.users, &self.search)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size)
    }

    pub fn derived_view(&self) -> UserView<'_> {
        let filtered = self.filtered();
        let total = total_pages(filtered.len(), self.page_size);
        let rows = page_slice(&filtered, self.page, self.page_size).to_vec();
        UserView {
            rows,
            page: self.page,
            total_pages: total,
            filtered_count: filtered.len(),
        }
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Keep the page inside `[1, max(total_pages, 1)]` after the collection changes.
    fn clamp_page(&mut self) {
        let max = self.total_pages().max(1);
        self.page = self.page.clamp(1, max);
    }
}
