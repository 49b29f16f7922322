//! One facade per Tremendous resource.
//!
//! Facades borrow the client and are pure parameter marshaling: each method
//! fixes a path, an envelope key, and a record type, then calls one of the
//! dispatch verbs on `TremendousClient`.

pub mod balance_transactions;
pub mod campaigns;
pub mod fields;
pub mod forex;
pub mod funding_sources;
pub mod invoices;
pub mod members;
pub mod orders;
pub mod organizations;
pub mod products;
pub mod rewards;
pub mod roles;
pub mod topups;
pub mod webhooks;

pub use balance_transactions::{BalanceTransaction, BalanceTransactions, ListBalanceTransactions};
pub use campaigns::{Campaign, Campaigns, CreateCampaign, EmailStyle, UpdateCampaign, WebpageStyle};
pub use fields::{Field, Fields};
pub use forex::{Forex, ForexRates};
pub use funding_sources::{FundingSource, FundingSources};
pub use invoices::{CreateInvoice, Invoice, Invoices, ListInvoices};
pub use members::{CreateMember, Member, Members};
pub use orders::{
    CreateOrder, DeliveryMethod, ListOrders, Order, OrderDelivery, OrderReward, Orders, Payment,
    PaymentSource, Refund,
};
pub use organizations::{CreateOrganization, Organization, Organizations};
pub use products::{Country, Documents, Image, ListProducts, Product, Products, Sku};
pub use rewards::{Delivery, ListRewards, Recipient, Reward, RewardValue, Rewards};
pub use roles::{Role, Roles};
pub use topups::{CreateTopup, ListTopups, Topup, Topups};
pub use webhooks::{CreateWebhook, Webhook, WebhookEvents, Webhooks};
