//! Admin back-office commands.
//!
//! These require an admin account; the server enforces the role check.

use std::path::PathBuf;

use clap::Subcommand;
use rust_decimal::Decimal;

use sole_trader_client::{ClientError, ImageUpload, NewProduct, ProductUpdate, Shop};
use sole_trader_core::{CategoryId, ProductId, ShoeSize, UserId};

#[derive(Subcommand)]
pub enum AdminAction {
    /// Show revenue and fulfillment numbers
    Stats,
    /// List every order in the system
    Orders,
    /// List all registered users
    Users,
    /// Block or unblock a user account
    SetBlocked {
        /// User id
        user: UserId,

        /// true to block, false to unblock
        blocked: bool,
    },
    /// Permanently delete a user account
    DeleteUser {
        /// User id
        user: UserId,
    },
    /// Create a product with images
    CreateProduct {
        #[arg(long)]
        name: String,

        #[arg(long)]
        brand: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        category: CategoryId,

        /// Stocked size; repeat for each
        #[arg(long = "size")]
        sizes: Vec<ShoeSize>,

        /// Image file; repeat for each
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Update an existing product
    UpdateProduct {
        /// Product id
        id: ProductId,

        #[arg(long)]
        name: String,

        #[arg(long)]
        brand: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        category: CategoryId,

        /// Stocked size; repeat for each
        #[arg(long = "size")]
        sizes: Vec<ShoeSize>,
    },
    /// Flip a product between active and deactivated
    ToggleProduct {
        /// Product id
        id: ProductId,
    },
}

pub async fn run(shop: &Shop, action: AdminAction) -> Result<(), ClientError> {
    let credential = shop.session().credential()?;
    let client = shop.client();

    match action {
        AdminAction::Stats => {
            let stats = client.dashboard_stats(&credential).await?;
            println!("Total revenue:       {}", stats.total_revenue);
            println!("Products purchased:  {}", stats.total_products_purchased);
            println!("Delivered orders:    {}", stats.delivered_orders_count);
        }
        AdminAction::Orders => {
            for order in client.all_orders(&credential).await? {
                println!(
                    "{:>6}  {}  {:<10}  {:>10}",
                    order.id,
                    order.created_at.format("%Y-%m-%d"),
                    order.status,
                    order.total
                );
            }
        }
        AdminAction::Users => {
            for user in client.list_users(&credential).await? {
                println!(
                    "{:>6}  {:<24}  {}{}",
                    user.id,
                    user.name,
                    user.email,
                    if user.is_blocked { "  [blocked]" } else { "" }
                );
            }
        }
        AdminAction::SetBlocked { user, blocked } => {
            client.set_user_blocked(&credential, user, blocked).await?;
            println!(
                "User {user} {}",
                if blocked { "blocked" } else { "unblocked" }
            );
        }
        AdminAction::DeleteUser { user } => {
            client.delete_user(&credential, user).await?;
            println!("User {user} deleted");
        }
        AdminAction::CreateProduct {
            name,
            brand,
            description,
            price,
            category,
            sizes,
            images,
        } => {
            let product = NewProduct {
                name,
                brand,
                description,
                price,
                category_id: category,
                sizes,
            };
            let uploads = read_images(images)?;
            let created = client.create_product(&credential, &product, uploads).await?;
            println!("Created product {}: {}", created.id, created.name);
        }
        AdminAction::UpdateProduct {
            id,
            name,
            brand,
            description,
            price,
            category,
            sizes,
        } => {
            let update = ProductUpdate {
                id,
                name,
                brand,
                description,
                price,
                category_id: category,
                sizes,
            };
            let updated = client.update_product(&credential, &update).await?;
            println!("Updated product {}: {}", updated.id, updated.name);
        }
        AdminAction::ToggleProduct { id } => {
            client.toggle_product_status(&credential, id).await?;
            println!("Toggled status of product {id}");
        }
    }
    Ok(())
}

fn read_images(paths: Vec<PathBuf>) -> Result<Vec<ImageUpload>, ClientError> {
    paths
        .into_iter()
        .map(|path| {
            let bytes = std::fs::read(&path)?;
            let file_name = path
                .file_name()
                .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
            Ok(ImageUpload {
                content_type: content_type_for(&file_name).to_owned(),
                file_name,
                bytes,
            })
        })
        .collect()
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("shoe.jpg"), "image/jpeg");
        assert_eq!(content_type_for("shoe.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("shoe.png"), "image/png");
        assert_eq!(content_type_for("shoe"), "application/octet-stream");
    }
}
