//! Catalog browsing commands.

use clap::Subcommand;

use sole_trader_client::{ClientError, Product, ProductFilter, Shop};
use sole_trader_core::{CategoryId, ProductId};

#[derive(Subcommand)]
pub enum ShopAction {
    /// List all products
    Products,
    /// Show one product in detail
    Product {
        /// Product id
        id: ProductId,
    },
    /// Search and filter products
    Search {
        /// Match against product names
        #[arg(long)]
        name: Option<String>,

        /// Filter by brand
        #[arg(long)]
        brand: Option<String>,

        /// Filter by category id
        #[arg(long)]
        category: Option<CategoryId>,

        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Results per page
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// List categories
    Categories,
}

pub async fn run(shop: &Shop, action: ShopAction) -> Result<(), ClientError> {
    let client = shop.client();
    match action {
        ShopAction::Products => {
            let products = client.get_products().await?;
            print_products(&products);
        }
        ShopAction::Product { id } => {
            let product = client.get_product(id).await?;
            println!("{} - {} ({})", product.id, product.name, product.brand);
            println!("Price: {}", product.price);
            if !product.description.is_empty() {
                println!("{}", product.description);
            }
            if !product.sizes.is_empty() {
                let sizes: Vec<String> =
                    product.sizes.iter().map(ToString::to_string).collect();
                println!("Sizes: {}", sizes.join(", "));
            }
            if !product.is_active {
                println!("(currently unavailable)");
            }
        }
        ShopAction::Search {
            name,
            brand,
            category,
            page,
            page_size,
        } => {
            let filter = ProductFilter {
                name,
                brand,
                category_id: category,
                page,
                page_size,
                descending: None,
            };
            let products = client.filter_products(&filter).await?;
            print_products(&products);
        }
        ShopAction::Categories => {
            for category in client.get_categories().await? {
                println!("{:>6}  {}", category.id, category.name);
            }
        }
    }
    Ok(())
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }
    for product in products {
        println!(
            "{:>6}  {:<32}  {:<16}  {:>10}",
            product.id, product.name, product.brand, product.price
        );
    }
}
