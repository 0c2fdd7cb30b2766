use crate::cli::util::{query_user, query_user_and_check};
use crate::cli::CliAuthTokenKey;
use crate::cli_error::CliError;
use crate::data_store::authorization::{AuthContext, Role};
use crate::data_store::{get_store_from_env, models, GigStockStore};
use std::str::FromStr;
use uuid::Uuid;

pub fn print_user_list() -> Result<(), CliError> {
    let data_store_pool = get_store_from_env()?;
    let mut data_store = data_store_pool.get_facade()?;

    let auth_key = CliAuthTokenKey::new();
    let auth = AuthContext::create_for_cli(Uuid::nil(), "cli".to_string(), &auth_key);
    let users = data_store.get_users(&auth)?;

    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED)
        .set_header(vec!["id", "name", "email", "role", "last login"])
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic)
        .add_rows(users.into_iter().map(|user| {
            [
                user.id.to_string(),
                user.name,
                user.email,
                user.role.name().to_string(),
                user.last_login
                    .map(|v| v.to_string())
                    .unwrap_or("never".to_owned()),
            ]
        }));

    println!("{table}");
    Ok(())
}

pub fn create_user_interactive() -> Result<(), CliError> {
    let data_store_pool = get_store_from_env()?;
    let mut data_store = data_store_pool.get_facade()?;

    let name: String = query_user_and_check("Full name of the new user", |name: &String| {
        if name.trim().is_empty() {
            Err("Name must not be empty")
        } else {
            Ok(())
        }
    });
    let email: String = query_user_and_check("E-mail address (used for login)", |email: &String| {
        if email.contains('@') {
            Ok(())
        } else {
            Err("Not a valid e-mail address")
        }
    });
    let role: RoleEntry = query_user("Account role (user/manager/admin)");
    let password: String = query_user_and_check("Password", |password: &String| {
        if password.is_empty() {
            Err("Password must not be empty")
        } else {
            Ok(())
        }
    });

    let auth_key = CliAuthTokenKey::new();
    let auth = AuthContext::create_for_cli(Uuid::nil(), "cli".to_string(), &auth_key);
    let user = data_store.create_user(
        &auth,
        models::NewUser {
            name,
            email,
            role: role.0,
            password,
        },
    )?;
    println!("Success. New user id: {}", user.id);
    Ok(())
}

struct RoleEntry(Role);

impl FromStr for RoleEntry {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "u" | "user" => Ok(Self(Role::User)),
            "m" | "manager" => Ok(Self(Role::Manager)),
            "a" | "admin" => Ok(Self(Role::Admin)),
            _ => Err("Unknown role. Must be 'user', 'manager' or 'admin'."),
        }
    }
}
