//! Session management commands.

use clap::Subcommand;

use sole_trader_client::{ClientError, SessionState, Shop};

#[derive(Subcommand)]
pub enum AccountAction {
    /// Log in and store the session durably
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Log out and clear the stored session
    Logout,
    /// Create a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Show the logged-in user
    Whoami,
}

pub async fn run(shop: &Shop, action: AccountAction) -> Result<(), ClientError> {
    match action {
        AccountAction::Login { email, password } => {
            let user = shop.session().login(&email, &password).await?;
            shop.cart().refresh().await?;
            if let Err(e) = shop.wishlist().refresh().await {
                tracing::warn!(error = %e, "Failed to load wishlist");
            }
            println!("Logged in as {} <{}>", user.name, user.email);
            println!("{} item(s) in your cart", shop.cart().line_count());
        }
        AccountAction::Logout => {
            shop.session().logout();
            println!("Logged out");
        }
        AccountAction::Register {
            name,
            email,
            password,
        } => {
            shop.session().register(&name, &email, &password).await?;
            println!("Account created for {email}; log in with `sole account login`");
        }
        AccountAction::Whoami => match shop.session().state() {
            SessionState::Authenticated(user) => {
                println!("{} <{}>{}", user.name, user.email, admin_tag(user.is_admin));
            }
            SessionState::Anonymous => println!("Not logged in"),
        },
    }
    Ok(())
}

const fn admin_tag(is_admin: bool) -> &'static str {
    if is_admin { " [admin]" } else { "" }
}
