//! Domain models for the order-management client.

mod cart;
mod order;
mod payment;
mod product;
mod user;

pub use cart::{Cart, CartItem, VendorGroup, group_by_vendor};
pub use order::{Order, OrderCreate, OrderItem, OrderStatus, OrdersCreate};
pub use payment::{PaymentInfo, PaymentMethod};
pub use product::{Product, ProductCreate, StockChange, StockUpdate};
pub use user::{User, UserRole};
