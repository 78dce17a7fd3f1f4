//! Gitea user resource
//!
//! Reconciles a declared user account against the Gitea admin API. Gitea's
//! create endpoint has no admin flag, so creating an administrator is a
//! [`CreateSequence`]: create the account, then promote it with an edit call.

use declarative::{DataError, FieldSchema, Resource, ResourceData, Schema, StateWriter, Value};
use giteakit::{AdminApi, CreateUserOption, EditUserOption, User};
use std::fmt;
use thiserror::Error;

/// Resource type name
pub const TYPE_NAME: &str = "gitea_user";

/// Field declarations for `gitea_user`
pub fn schema() -> Schema {
    Schema::new(vec![
        FieldSchema::int("gitea_id").computed(),
        FieldSchema::string("login").required(),
        FieldSchema::string("full_name").required(),
        FieldSchema::string("email").required(),
        FieldSchema::string("avatar_url").computed(),
        FieldSchema::string("username"),
        FieldSchema::string("password").required().sensitive(),
        FieldSchema::bool("is_admin").default_value(false),
    ])
}

/// Errors from the user lifecycle
#[derive(Debug, Error)]
pub enum UserError {
    /// Declared configuration could not be read
    #[error("invalid user configuration")]
    Config(#[from] DataError),

    #[error("unable to create user")]
    Create(#[source] giteakit::Error),

    #[error("unable to retrieve user {username}")]
    Retrieve {
        username: String,
        #[source]
        source: giteakit::Error,
    },

    #[error("unable to edit user {username}")]
    Edit {
        username: String,
        #[source]
        source: giteakit::Error,
    },

    /// Writing a remote value into tracked state failed
    #[error("cannot set {field}")]
    Project {
        field: &'static str,
        #[source]
        source: DataError,
    },
}

/// Behavior switches for [`UserResource`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserOptions {
    /// Follow every successful edit with a read, so tracked state picks up
    /// whatever Gitea normalized
    pub refresh_after_update: bool,
}

/// Desired fields read once per operation
struct UserConfig {
    login: String,
    full_name: String,
    email: String,
    username: String,
    password: String,
    is_admin: bool,
}

impl UserConfig {
    fn from_data(d: &ResourceData) -> Result<Self, DataError> {
        Ok(Self {
            login: d.get_str("login")?,
            full_name: d.get_str("full_name")?,
            email: d.get_str("email")?,
            username: d.get_str("username")?,
            password: d.get_str("password")?,
            is_admin: d.get_bool("is_admin")?,
        })
    }

    fn create_option(&self) -> CreateUserOption {
        CreateUserOption {
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            login_name: self.login.clone(),
            password: self.password.clone(),
            send_notify: false,
            username: self.username.clone(),
        }
    }

    fn edit_option(&self) -> EditUserOption {
        EditUserOption {
            admin: Some(self.is_admin),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            login_name: self.login.clone(),
            password: self.password.clone(),
        }
    }
}

/// Copy the authoritative fields of `user` into tracked state
///
/// Fields are written in a fixed order and the first rejected write stops
/// the projection. Fields written before the failure stay written.
pub fn project(tracked: &mut impl StateWriter, user: &User) -> Result<(), UserError> {
    let fields: [(&'static str, Value); 5] = [
        ("avatar_url", Value::from(user.avatar_url.as_str())),
        ("email", Value::from(user.email.as_str())),
        ("full_name", Value::from(user.full_name.as_str())),
        ("gitea_id", Value::Int(user.id)),
        ("username", Value::from(user.username.as_str())),
    ];

    for (field, value) in fields {
        tracked
            .set(field, value)
            .map_err(|source| UserError::Project { field, source })?;
    }
    Ok(())
}

/// One step run after the account has been created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStep {
    /// Project the created account into tracked state
    Project,
    /// Grant admin through an edit call
    Promote,
    /// Re-fetch the promoted account and project it
    Refresh,
}

/// Steps that turn a freshly created Gitea account into the declared one
///
/// The account is always created first. Failures keep the variant of the
/// step that raised them: the account creation fails with
/// [`UserError::Create`], the promotion with [`UserError::Edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSequence {
    steps: Vec<CreateStep>,
}

impl CreateSequence {
    pub fn new(is_admin: bool, options: UserOptions) -> Self {
        let steps = match (is_admin, options.refresh_after_update) {
            (false, _) => vec![CreateStep::Project],
            (true, false) => vec![CreateStep::Promote],
            (true, true) => vec![CreateStep::Promote, CreateStep::Refresh],
        };
        Self { steps }
    }

    /// Steps following the account creation, in order
    pub fn steps(&self) -> &[CreateStep] {
        &self.steps
    }

    fn run<C: AdminApi>(
        &self,
        client: &C,
        config: &UserConfig,
        d: &mut ResourceData,
    ) -> Result<User, UserError> {
        log::debug!("creating gitea user (login={})", config.login);
        let mut user = client
            .create_user(&config.create_option())
            .map_err(UserError::Create)?;
        log::info!("created gitea user {} (id {})", user.username, user.id);

        for step in self.steps() {
            match step {
                CreateStep::Project => project(d, &user)?,
                CreateStep::Promote => edit(client, address_for_promotion(config, &user), config)?,
                CreateStep::Refresh => {
                    let username = address_for_promotion(config, &user).to_string();
                    user = fetch_and_project(client, &username, d)?;
                }
            }
        }
        Ok(user)
    }
}

/// The declared username, or the one Gitea derived when none was declared
fn address_for_promotion<'a>(config: &'a UserConfig, created: &'a User) -> &'a str {
    if config.username.is_empty() {
        &created.username
    } else {
        &config.username
    }
}

fn edit<C: AdminApi>(client: &C, username: &str, config: &UserConfig) -> Result<(), UserError> {
    log::debug!("editing gitea user {username} (admin={})", config.is_admin);
    client
        .edit_user(username, &config.edit_option())
        .map_err(|source| UserError::Edit {
            username: username.to_string(),
            source,
        })
}

fn fetch_and_project<C: AdminApi>(
    client: &C,
    username: &str,
    d: &mut ResourceData,
) -> Result<User, UserError> {
    log::debug!("fetching gitea user {username}");
    let user = client
        .get_user_info(username)
        .map_err(|source| UserError::Retrieve {
            username: username.to_string(),
            source,
        })?;
    project(d, &user)?;
    Ok(user)
}

/// `gitea_user` resource backed by an [`AdminApi`] client
pub struct UserResource<C> {
    client: C,
    options: UserOptions,
}

impl<C: AdminApi> UserResource<C> {
    pub fn new(client: C) -> Self {
        Self::with_options(client, UserOptions::default())
    }

    pub fn with_options(client: C, options: UserOptions) -> Self {
        Self { client, options }
    }

    /// Create the account; returns the account as Gitea created it
    pub fn create_user(&self, d: &mut ResourceData) -> Result<User, UserError> {
        let config = UserConfig::from_data(d)?;
        CreateSequence::new(config.is_admin, self.options).run(&self.client, &config, d)
    }

    /// Fetch the account and project it into tracked state
    ///
    /// Addressed by the tracked username when one has been observed,
    /// otherwise by the declared one.
    pub fn read_user(&self, d: &mut ResourceData) -> Result<User, UserError> {
        let username = match d.tracked_str("username") {
            Some(tracked) => tracked.to_string(),
            None => d.get_str("username")?,
        };
        fetch_and_project(&self.client, &username, d)
    }

    /// Push the declared fields to the account addressed by the declared
    /// username
    pub fn update_user(&self, d: &mut ResourceData) -> Result<(), UserError> {
        let config = UserConfig::from_data(d)?;
        edit(&self.client, &config.username, &config)?;

        if self.options.refresh_after_update {
            fetch_and_project(&self.client, &config.username, d)?;
        }
        Ok(())
    }

    /// Delete the account addressed by the declared username
    ///
    /// The client error is returned as is.
    pub fn delete_user(&self, d: &ResourceData) -> giteakit::Result<()> {
        let username = match d.get_str("username") {
            Ok(username) => username,
            Err(e) => {
                // left to Gitea to reject, like an empty declared username
                log::debug!("no usable username for delete: {e}");
                String::new()
            }
        };
        log::debug!("deleting gitea user {username:?}");
        self.client.delete_user(&username)
    }
}

impl<C> fmt::Debug for UserResource<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserResource")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<C: AdminApi> Resource for UserResource<C> {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn create(&self, d: &mut ResourceData) -> anyhow::Result<()> {
        self.create_user(d)?;
        Ok(())
    }

    fn read(&self, d: &mut ResourceData) -> anyhow::Result<()> {
        self.read_user(d)?;
        Ok(())
    }

    fn update(&self, d: &mut ResourceData) -> anyhow::Result<()> {
        self.update_user(d)?;
        Ok(())
    }

    fn delete(&self, d: &mut ResourceData) -> anyhow::Result<()> {
        self.delete_user(d)?;
        Ok(())
    }
}
