//! Order commands.

use clap::Subcommand;

use sole_trader_client::{CheckoutRequest, ClientError, Order, PaymentVerification, Shop};
use sole_trader_core::{OrderId, PaymentMethod};

#[derive(Subcommand)]
pub enum OrderAction {
    /// List your orders
    List,
    /// Show one order in detail
    Show {
        /// Order id
        id: OrderId,
    },
    /// Cancel an order that has not shipped
    Cancel {
        /// Order id
        id: OrderId,
    },
    /// Place an order from the current cart
    Checkout {
        /// Shipping address
        #[arg(short, long)]
        address: String,

        /// Payment method: cod or razorpay
        #[arg(short, long, default_value = "cod")]
        payment: String,
    },
    /// Verify a completed gateway payment
    VerifyPayment {
        /// Gateway order id
        #[arg(long)]
        order: String,

        /// Gateway payment id
        #[arg(long)]
        payment: String,

        /// Gateway signature
        #[arg(long)]
        signature: String,
    },
}

pub async fn run(shop: &Shop, action: OrderAction) -> Result<(), ClientError> {
    let credential = shop.session().credential()?;
    let client = shop.client();

    match action {
        OrderAction::List => {
            let orders = client.my_orders(&credential).await?;
            if orders.is_empty() {
                println!("No orders yet");
            }
            for order in orders {
                print_order_line(&order);
            }
        }
        OrderAction::Show { id } => {
            let order = client.get_order(&credential, id).await?;
            print_order_line(&order);
            for item in &order.items {
                println!(
                    "    product {} size {} x{} @ {}",
                    item.product_id, item.size, item.quantity, item.price
                );
            }
            println!("    ship to: {}", order.shipping_address);
        }
        OrderAction::Cancel { id } => {
            let order = client.cancel_order(&credential, id).await?;
            println!("Order {} is now {}", order.id, order.status);
        }
        OrderAction::Checkout { address, payment } => {
            let payment_method: PaymentMethod = payment
                .parse()
                .map_err(ClientError::Validation)?;

            if payment_method == PaymentMethod::Razorpay {
                let amount = shop.cart().subtotal().amount;
                let gateway_order =
                    client.create_payment_order(&credential, amount).await?;
                println!(
                    "Gateway order {} created for {} {}; complete payment in the gateway, then re-run checkout",
                    gateway_order.id, gateway_order.amount, gateway_order.currency
                );
                return Ok(());
            }

            let order = client
                .checkout(
                    &credential,
                    &CheckoutRequest {
                        shipping_address: address,
                        payment_method,
                    },
                )
                .await?;
            // The server drained the cart into the order
            shop.cart().refresh().await?;
            println!("Order {} placed, total {}", order.id, order.total);
        }
        OrderAction::VerifyPayment {
            order,
            payment,
            signature,
        } => {
            client
                .verify_payment(
                    &credential,
                    &PaymentVerification {
                        razorpay_order_id: order,
                        razorpay_payment_id: payment,
                        razorpay_signature: signature,
                    },
                )
                .await?;
            shop.cart().refresh().await?;
            println!("Payment verified");
        }
    }
    Ok(())
}

fn print_order_line(order: &Order) {
    println!(
        "{:>6}  {}  {:<10}  {:>10}  {}",
        order.id,
        order.created_at.format("%Y-%m-%d"),
        order.status,
        order.total,
        order.payment_method
    );
}
