//! Wishlist commands.

use clap::Subcommand;

use sole_trader_client::{ClientError, Shop};
use sole_trader_core::ProductId;

#[derive(Subcommand)]
pub enum WishlistAction {
    /// List wishlist product ids
    Show,
    /// Flip wishlist membership for a product
    Toggle {
        /// Product id
        product: ProductId,
    },
}

pub async fn run(shop: &Shop, action: WishlistAction) -> Result<(), ClientError> {
    let wishlist = shop.wishlist();
    match action {
        WishlistAction::Show => {
            wishlist.refresh().await?;
            let ids = wishlist.product_ids();
            if ids.is_empty() {
                println!("Wishlist is empty");
            } else {
                for id in ids {
                    println!("{id}");
                }
            }
        }
        WishlistAction::Toggle { product } => {
            let now_present = wishlist.toggle(product).await?;
            if now_present {
                println!("Added {product} to wishlist");
            } else {
                println!("Removed {product} from wishlist");
            }
        }
    }
    Ok(())
}
