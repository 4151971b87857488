mod goods;

pub use gatepay_tools::helpers::settlement_currency;
pub use goods::{goods_name, limit_goods_name, ELLIPSIS, GOODS_NAME_LIMIT};
