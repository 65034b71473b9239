use anyhow::{Context, Result};
use speakup_application::AppContext;

use super::Output;

pub async fn login(context: &AppContext, out: &Output, email: &str, password: &str) -> Result<()> {
    let payload = context
        .session()
        .login(email, password)
        .await
        .context("Login failed")?;
    out.emit(&payload.identity, |identity| {
        println!("Signed in as {} <{}>", identity.name, identity.email);
    })
}

pub async fn register(
    context: &AppContext,
    out: &Output,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let payload = context
        .session()
        .register(name, email, password)
        .await
        .context("Registration failed")?;
    out.emit(&payload.identity, |identity| {
        println!("Welcome, {}! You are signed in.", identity.name);
    })
}

pub async fn logout(context: &AppContext) {
    let was_signed_in = context.session().is_authenticated();
    context.session().logout().await;
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Nobody was signed in.");
    }
}

pub fn whoami(context: &AppContext, out: &Output) -> Result<()> {
    match context.session().identity() {
        Some(identity) => out.emit(&identity, |identity| {
            println!("{} <{}> ({})", identity.name, identity.email, identity.id);
        }),
        None => {
            println!("Not signed in.");
            Ok(())
        }
    }
}
