//! Cart commands.

use clap::Subcommand;

use sole_trader_client::{ClientError, Shop};
use sole_trader_core::{LineItemId, ProductId, ShoeSize};

#[derive(Subcommand)]
pub enum CartAction {
    /// List cart contents
    Show,
    /// Add a (product, size) line to the cart
    Add {
        /// Product id
        #[arg(short, long)]
        product: ProductId,

        /// Shoe size, e.g. 10 or 10.5
        #[arg(short, long)]
        size: ShoeSize,

        /// Quantity (1-99)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line by its id
    Remove {
        /// Line item id (see `sole cart show`)
        line: LineItemId,
    },
    /// Set the quantity of an existing line
    SetQuantity {
        /// Line item id
        line: LineItemId,

        /// New quantity (1-99)
        quantity: u32,
    },
    /// Remove every line
    Clear,
}

pub async fn run(shop: &Shop, action: CartAction) -> Result<(), ClientError> {
    let cart = shop.cart();
    match action {
        CartAction::Show => {
            cart.refresh().await?;
            print_cart(shop);
        }
        CartAction::Add {
            product,
            size,
            quantity,
        } => {
            cart.add(product, size, quantity).await?;
            println!("Added to cart");
            print_cart(shop);
        }
        CartAction::Remove { line } => {
            cart.remove(line).await?;
            println!("Removed line {line}");
            print_cart(shop);
        }
        CartAction::SetQuantity { line, quantity } => {
            cart.set_quantity(line, quantity).await?;
            println!("Updated quantity");
            print_cart(shop);
        }
        CartAction::Clear => {
            cart.clear().await?;
            println!("Cart cleared");
        }
    }
    Ok(())
}

fn print_cart(shop: &Shop) {
    let cart = shop.cart();
    let items = cart.items();
    if items.is_empty() {
        println!("Cart is empty");
        return;
    }

    println!("{:>6}  {:>8}  {:>5}  {:>4}  {:>10}", "line", "product", "size", "qty", "total");
    for item in &items {
        println!(
            "{:>6}  {:>8}  {:>5}  {:>4}  {:>10}",
            item.id,
            item.product_id,
            item.size,
            item.quantity,
            item.line_total()
        );
    }
    println!(
        "{} line(s), {} item(s), subtotal {}",
        cart.line_count(),
        cart.total_quantity(),
        cart.subtotal()
    );
}
