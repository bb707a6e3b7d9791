//! Admin account management commands.

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use mallhub_core::config::AppConfig;
use mallhub_core::types::Query;
use mallhub_entity::admin::{AdminField, AdminView};
use mallhub_service::admin::CreateAdminRequest;

use crate::output::{self, OutputFormat};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an admin (prompts for anything not given)
    Create {
        /// Login name
        #[arg(short, long)]
        username: Option<String>,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Allow this admin to create other admins
        #[arg(long = "super")]
        is_super: bool,
    },
    /// Delete every admin whose field matches the value
    Delete {
        /// Column to match on
        #[arg(long, value_enum)]
        field: FieldArg,
        /// Value to match
        #[arg(long)]
        value: String,
    },
    /// List admins
    List {
        /// Page index (0-based)
        #[arg(long, default_value_t = 0)]
        page: i64,
        /// Page size
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

/// Column an admin may be deleted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Id,
    Username,
}

impl From<FieldArg> for AdminField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Id => Self::Id,
            FieldArg::Username => Self::Username,
        }
    }
}

/// Admin display row for table output
#[derive(Debug, Serialize, Tabled)]
struct AdminRow {
    id: String,
    username: String,
    name: String,
    #[tabled(rename = "super")]
    is_super: bool,
    created_at: String,
}

impl From<AdminView> for AdminRow {
    fn from(view: AdminView) -> Self {
        Self {
            id: view.id.to_string(),
            username: view.username,
            name: view.name,
            is_super: view.is_super,
            created_at: view.created_at,
        }
    }
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let pool = super::connect(config).await?;
    let service = super::admin_service(config, &pool);

    let result = match &args.command {
        AdminCommand::Create {
            username,
            name,
            password,
            is_super,
        } => {
            let username = match username {
                Some(u) => u.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Admin username")
                    .interact_text()
                    .context("input error")?,
            };

            let name = match name {
                Some(n) => n.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Display name")
                    .default(username.clone())
                    .interact_text()
                    .context("input error")?,
            };

            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .context("input error")?,
            };

            service
                .create(CreateAdminRequest {
                    username,
                    name,
                    password,
                    is_super: *is_super,
                })
                .await
                .map(|admin| {
                    output::print_success(&format!(
                        "Admin '{}' created (id: {})",
                        admin.username, admin.id
                    ));
                })
        }
        AdminCommand::Delete { field, value } => service
            .delete_by_field((*field).into(), value.clone())
            .await
            .map(|count| output::print_success(&format!("Deleted {count} admin(s)"))),
        AdminCommand::List { page, limit } => service
            .list(Query::new(*page, *limit))
            .await
            .map(|paged| {
                let rows: Vec<AdminRow> = paged.items.into_iter().map(AdminRow::from).collect();
                output::print_list(&rows, format);
                if format == OutputFormat::Table {
                    output::print_kv("Total", &paged.total.to_string());
                }
            }),
    };

    pool.close().await;
    Ok(result?)
}
