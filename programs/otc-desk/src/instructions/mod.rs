pub mod admin;
pub mod approve_offer;
pub mod auto_claim;
pub mod cancel_offer;
pub mod claim;
pub mod cleanup;
pub mod create_consignment;
pub mod create_offer;
pub mod emergency;
pub mod fulfill_offer;
pub mod init_desk;
pub mod register_token;
pub mod treasury;
pub mod update_prices;
pub mod withdraw_consignment;

pub use admin::*;
pub use approve_offer::*;
pub use auto_claim::*;
pub use cancel_offer::*;
pub use claim::*;
pub use cleanup::*;
pub use create_consignment::*;
pub use create_offer::*;
pub use emergency::*;
pub use fulfill_offer::*;
pub use init_desk::*;
pub use register_token::*;
pub use treasury::*;
pub use update_prices::*;
pub use withdraw_consignment::*;
