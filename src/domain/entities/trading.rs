//! # Trading Records
//!
//! MTT trading pairs, orders and their executions, token issuance,
//! payment routing engines and liquidity pools.
//!
//! Orders keep `remaining_quantity = quantity - filled_quantity` on every
//! save; pool prices and path success rates are derived on read. No
//! matching or routing runs against these records.

use crate::domain::entities::record::{impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::amounts::{
    HUNDRED, ensure_non_negative, ensure_percentage, ensure_positive, ratio_or_zero,
};
use crate::domain::value_objects::chain::{abbreviate, validate_address, validate_tx_hash};
use crate::domain::value_objects::choices::choice_enum;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

choice_enum! {
    /// Order type.
    pub enum OrderType("order_type") {
        Market = "MARKET" => "Market Order",
        Limit = "LIMIT" => "Limit Order",
        Stop = "STOP" => "Stop Order",
        StopLimit = "STOP_LIMIT" => "Stop Limit Order",
    }
}

choice_enum! {
    /// Order side.
    pub enum OrderSide("side") {
        Buy = "BUY" => "Buy",
        Sell = "SELL" => "Sell",
    }
}

choice_enum! {
    /// Order lifecycle.
    pub enum OrderStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Open = "OPEN" => "Open",
        PartiallyFilled = "PARTIALLY_FILLED" => "Partially Filled",
        Filled = "FILLED" => "Filled",
        Cancelled = "CANCELLED" => "Cancelled",
        Rejected = "REJECTED" => "Rejected",
        Expired = "EXPIRED" => "Expired",
    }
}

impl OrderStatus {
    /// Whether the order can no longer receive fills.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Cancelled | Self::Rejected | Self::Expired
        )
    }
}

choice_enum! {
    /// Time in force.
    pub enum TimeInForce("time_in_force") = Gtc {
        Gtc = "GTC" => "Good Till Cancelled",
        Ioc = "IOC" => "Immediate or Cancel",
        Fok = "FOK" => "Fill or Kill",
    }
}

choice_enum! {
    /// Kind of token issuance.
    pub enum IssuanceType("issuance_type") {
        Initial = "INITIAL" => "Initial Issuance",
        Reward = "REWARD" => "Reward Issuance",
        Bonus = "BONUS" => "Bonus Issuance",
        Burn = "BURN" => "Token Burn",
        Mint = "MINT" => "Additional Mint",
    }
}

choice_enum! {
    /// Issuance lifecycle.
    pub enum IssuanceStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        Processing = "PROCESSING" => "Processing",
        Completed = "COMPLETED" => "Completed",
        Failed = "FAILED" => "Failed",
        Cancelled = "CANCELLED" => "Cancelled",
    }
}

choice_enum! {
    /// Routing strategy.
    pub enum RoutingStrategy("strategy") {
        Direct = "DIRECT" => "Direct Transfer",
        MultiHop = "MULTI_HOP" => "Multi-hop Routing",
        LiquidityBased = "LIQUIDITY_BASED" => "Liquidity-based Routing",
        CostOptimized = "COST_OPTIMIZED" => "Cost Optimized",
        SpeedOptimized = "SPEED_OPTIMIZED" => "Speed Optimized",
    }
}

choice_enum! {
    /// Routing engine status.
    pub enum EngineStatus("status") = Active {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        Maintenance = "MAINTENANCE" => "Maintenance",
    }
}

// ============================================================================
// Trading pairs and orders
// ============================================================================

/// A tradable pair such as `MTT/USD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingPair {
    /// Primary key.
    pub id: Uuid,
    /// Base currency (MTT).
    pub base_currency: String,
    /// Quote currency.
    pub quote_currency: String,
    /// Unique symbol.
    pub symbol: String,
    /// Open for trading.
    pub is_active: bool,
    /// Minimum order size.
    pub min_order_size: Decimal,
    /// Maximum order size.
    pub max_order_size: Option<Decimal>,
    /// Maker fee percentage.
    pub maker_fee: Decimal,
    /// Taker fee percentage.
    pub taker_fee: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl TradingPair {
    /// Creates an active pair with symbol `BASE/QUOTE`.
    #[must_use]
    pub fn new(base_currency: impl Into<String>, quote_currency: impl Into<String>) -> Self {
        let base_currency = base_currency.into();
        let quote_currency = quote_currency.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            symbol: format!("{base_currency}/{quote_currency}"),
            base_currency,
            quote_currency,
            is_active: true,
            min_order_size: Decimal::ONE,
            max_order_size: None,
            maker_fee: Decimal::new(1, 1),
            taker_fee: Decimal::new(2, 1),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates sizes and fees.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("min_order_size", self.min_order_size)?;
        if let Some(max) = self.max_order_size {
            ensure_positive("max_order_size", max)?;
        }
        ensure_percentage("maker_fee", self.maker_fee)?;
        ensure_percentage("taker_fee", self.taker_fee)?;
        Ok(())
    }
}

impl_record!(
    TradingPair,
    table = "maythetoken_trading_pair",
    plural = "trading pairs",
    listed_by = created_at,
    updated = updated_at,
    validate = TradingPair::validate,
    keys = |p| vec![
        key("symbol", &p.symbol),
        key("base_quote", format!("{}/{}", p.base_currency, p.quote_currency)),
    ]
);

/// A trading order for MTT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOrder {
    /// Primary key.
    pub id: Uuid,
    /// Owner.
    pub user_id: Uuid,
    /// Traded pair.
    pub trading_pair_id: Uuid,
    /// Order type.
    pub order_type: OrderType,
    /// Side.
    pub side: OrderSide,
    /// Ordered quantity.
    pub quantity: Decimal,
    /// Limit price, `None` for market orders.
    pub price: Option<Decimal>,
    /// Stop trigger price.
    pub stop_price: Option<Decimal>,
    /// Filled so far.
    pub filled_quantity: Decimal,
    /// `quantity - filled_quantity`, derived on save.
    pub remaining_quantity: Decimal,
    /// Volume-weighted fill price.
    pub average_price: Option<Decimal>,
    /// Sum of fill values.
    pub total_value: Decimal,
    /// Commission charged.
    pub commission: Decimal,
    /// Commission asset.
    pub commission_asset: String,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Time of the final fill.
    pub executed_at: Option<DateTime<Utc>>,
    /// Expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TradeOrder {
    /// Creates a pending GTC order.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        trading_pair_id: Uuid,
        order_type: OrderType,
        side: OrderSide,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            trading_pair_id,
            order_type,
            side,
            quantity,
            price,
            stop_price: None,
            filled_quantity: Decimal::ZERO,
            remaining_quantity: quantity,
            average_price: None,
            total_value: Decimal::ZERO,
            commission: Decimal::ZERO,
            commission_asset: "MTT".to_string(),
            status: OrderStatus::default(),
            time_in_force: TimeInForce::default(),
            created_at: now,
            updated_at: now,
            executed_at: None,
            expires_at: None,
        }
    }

    /// Recomputes `remaining_quantity`.
    pub fn refresh_remaining(&mut self) {
        self.remaining_quantity = self.quantity - self.filled_quantity;
    }

    /// Records a fill of `quantity` at `price`.
    ///
    /// Updates the volume-weighted average price and total value and moves
    /// the order to `PARTIALLY_FILLED` or `FILLED`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::InvalidAmount`] for a non-positive quantity or price
    /// - [`DomainError::OperationNotAllowed`] if the order is terminal
    /// - [`DomainError::Overfill`] if the fill exceeds the remaining quantity
    /// - [`DomainError::Overflow`] if a running total does not fit
    pub fn record_fill(&mut self, quantity: Decimal, price: Decimal) -> DomainResult<()> {
        ensure_positive("fill quantity", quantity)?;
        ensure_positive("fill price", price)?;
        if self.status.is_terminal() {
            return Err(DomainError::OperationNotAllowed(format!(
                "order {} is {}",
                self.id, self.status
            )));
        }
        self.refresh_remaining();
        if quantity > self.remaining_quantity {
            return Err(DomainError::Overfill {
                fill: quantity.to_string(),
                remaining: self.remaining_quantity.to_string(),
            });
        }

        let fill_value = quantity.checked_mul(price).ok_or(DomainError::Overflow)?;
        let total_value = self
            .total_value
            .checked_add(fill_value)
            .ok_or(DomainError::Overflow)?;
        let filled = self
            .filled_quantity
            .checked_add(quantity)
            .ok_or(DomainError::Overflow)?;
        let average = total_value
            .checked_div(filled)
            .ok_or(DomainError::DivisionByZero)?;

        self.total_value = total_value;
        self.filled_quantity = filled;
        self.average_price = Some(average);
        self.refresh_remaining();
        if self.remaining_quantity.is_zero() {
            self.status = OrderStatus::Filled;
            self.executed_at = Some(Utc::now());
        } else {
            self.status = OrderStatus::PartiallyFilled;
        }
        Ok(())
    }

    /// Validates quantities and prices.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("quantity", self.quantity)?;
        ensure_non_negative("filled_quantity", self.filled_quantity)?;
        if self.filled_quantity > self.quantity {
            return Err(DomainError::Overfill {
                fill: self.filled_quantity.to_string(),
                remaining: self.quantity.to_string(),
            });
        }
        if self.order_type != OrderType::Market && self.price.is_none() {
            return Err(DomainError::invalid_field(
                "price",
                format!("required for {} orders", self.order_type.label()),
            ));
        }
        if matches!(self.order_type, OrderType::Stop | OrderType::StopLimit)
            && self.stop_price.is_none()
        {
            return Err(DomainError::invalid_field("stop_price", "required for stop orders"));
        }
        Ok(())
    }
}

impl fmt::Display for TradeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price {
            Some(price) => write!(f, "{} {} @ {price}", self.side, self.quantity),
            None => write!(f, "{} {} @ market", self.side, self.quantity),
        }
    }
}

impl_record!(
    TradeOrder,
    table = "maythetoken_trade_order",
    plural = "orders",
    listed_by = created_at,
    updated = updated_at,
    validate = TradeOrder::validate,
    prepare = |o, _now| {
        o.refresh_remaining();
    }
);

/// A single fill between a buy and a sell order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExecution {
    /// Primary key.
    pub id: Uuid,
    /// Buy side.
    pub buy_order_id: Uuid,
    /// Sell side.
    pub sell_order_id: Uuid,
    /// Traded pair.
    pub trading_pair_id: Uuid,
    /// Filled quantity.
    pub quantity: Decimal,
    /// Fill price.
    pub price: Decimal,
    /// `quantity * price`.
    pub total_value: Decimal,
    /// Buyer fee.
    pub buyer_fee: Decimal,
    /// Seller fee.
    pub seller_fee: Decimal,
    /// Execution time.
    pub executed_at: DateTime<Utc>,
}

impl TradeExecution {
    /// Creates an execution; `total_value` is `quantity * price`.
    #[must_use]
    pub fn new(
        buy_order_id: Uuid,
        sell_order_id: Uuid,
        trading_pair_id: Uuid,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            buy_order_id,
            sell_order_id,
            trading_pair_id,
            quantity,
            price,
            total_value: quantity.checked_mul(price).unwrap_or(Decimal::ZERO),
            buyer_fee: Decimal::ZERO,
            seller_fee: Decimal::ZERO,
            executed_at: Utc::now(),
        }
    }
}

impl_record!(
    TradeExecution,
    table = "maythetoken_trade_execution",
    plural = "executions",
    listed_by = executed_at
);

/// Issuance, mint or burn of MTT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenIssuance {
    /// Primary key.
    pub id: Uuid,
    /// Issued token.
    pub token_id: Uuid,
    /// Kind of issuance.
    pub issuance_type: IssuanceType,
    /// Amount.
    pub amount: Decimal,
    /// Receiving user.
    pub recipient_id: Option<Uuid>,
    /// Receiving address.
    pub recipient_address: Option<String>,
    /// On-chain hash, unique when present.
    pub transaction_hash: Option<String>,
    /// Block number.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: Option<u64>,
    /// Authorizing staff user.
    pub authorized_by_id: Uuid,
    /// Authorization signature.
    pub authorization_signature: Option<String>,
    /// Lifecycle status.
    pub status: IssuanceStatus,
    /// Reason.
    pub reason: String,
    /// Notes.
    pub notes: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Execution time.
    pub executed_at: Option<DateTime<Utc>>,
}

impl TokenIssuance {
    /// Creates a pending issuance.
    #[must_use]
    pub fn new(
        token_id: Uuid,
        issuance_type: IssuanceType,
        amount: Decimal,
        authorized_by_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            token_id,
            issuance_type,
            amount,
            recipient_id: None,
            recipient_address: None,
            transaction_hash: None,
            block_number: None,
            gas_used: None,
            authorized_by_id,
            authorization_signature: None,
            status: IssuanceStatus::default(),
            reason: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
            executed_at: None,
        }
    }

    /// Validates amount, recipient address and hash.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive("amount", self.amount)?;
        if let Some(address) = &self.recipient_address {
            validate_address(address)?;
        }
        if let Some(hash) = &self.transaction_hash {
            validate_tx_hash(hash)?;
        }
        Ok(())
    }
}

impl_record!(
    TokenIssuance,
    table = "maythetoken_issuance",
    plural = "issuances",
    listed_by = created_at,
    updated = updated_at,
    validate = TokenIssuance::validate,
    keys = |i| i
        .transaction_hash
        .iter()
        .map(|hash| key("transaction_hash", hash))
        .collect()
);

// ============================================================================
// Routing
// ============================================================================

/// Payment routing engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingEngine {
    /// Primary key.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Strategy.
    pub strategy: RoutingStrategy,
    /// Maximum hops.
    pub max_hops: u16,
    /// Routing time budget in seconds.
    pub max_routing_time_seconds: u32,
    /// Minimum pool liquidity considered.
    pub min_liquidity_threshold: Decimal,
    /// Base fee percentage.
    pub base_routing_fee: Decimal,
    /// Fee multiplier per hop, at least 1.
    pub hop_fee_multiplier: Decimal,
    /// Status.
    pub status: EngineStatus,
    /// Default engine; at most one.
    pub is_default: bool,
    /// Lower runs first.
    pub priority: u16,
    /// Historical success percentage.
    pub success_rate: Decimal,
    /// Average routing time in seconds.
    pub average_routing_time_secs: Option<i64>,
    /// Volume routed.
    pub total_volume_routed: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
}

impl RoutingEngine {
    /// Creates an active, non-default engine.
    #[must_use]
    pub fn new(name: impl Into<String>, strategy: RoutingStrategy) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            strategy,
            max_hops: 3,
            max_routing_time_seconds: 30,
            min_liquidity_threshold: Decimal::from(1000),
            base_routing_fee: Decimal::new(5, 2),
            hop_fee_multiplier: Decimal::new(15, 1),
            status: EngineStatus::default(),
            is_default: false,
            priority: 100,
            success_rate: Decimal::ZERO,
            average_routing_time_secs: None,
            total_volume_routed: Decimal::ZERO,
            created_at: now,
            updated_at: now,
            last_used: None,
        }
    }

    /// Validates fee and threshold ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_non_negative("min_liquidity_threshold", self.min_liquidity_threshold)?;
        ensure_percentage("base_routing_fee", self.base_routing_fee)?;
        ensure_percentage("success_rate", self.success_rate)?;
        if self.hop_fee_multiplier < Decimal::ONE {
            return Err(DomainError::invalid_field(
                "hop_fee_multiplier",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl_record!(
    RoutingEngine,
    table = "maythetoken_routing_engine",
    plural = "routing engines",
    listed_by = created_at,
    updated = updated_at,
    validate = RoutingEngine::validate,
    keys = |e| vec![key("name", &e.name)],
    exclusive = |_e| (crate::domain::entities::record::ExclusiveFlag::GLOBAL_OWNER, is_default)
);

/// A path between two addresses known to a routing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingPath {
    /// Primary key.
    pub id: Uuid,
    /// Owning engine.
    pub routing_engine_id: Uuid,
    /// Source address.
    pub from_address: String,
    /// Destination address.
    pub to_address: String,
    /// Hops in between.
    pub intermediate_addresses: Vec<String>,
    /// Number of hops.
    pub path_length: u16,
    /// Estimated cost.
    pub estimated_cost: Decimal,
    /// Estimated time in seconds.
    pub estimated_time_seconds: u32,
    /// Liquidity score, 0 to 100.
    pub liquidity_score: u8,
    /// Times used.
    pub usage_count: u32,
    /// Successful uses.
    pub success_count: u32,
    /// Failed uses.
    pub failure_count: u32,
    /// Last use.
    pub last_used: Option<DateTime<Utc>>,
    /// Considered by the engine.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl RoutingPath {
    /// Creates a direct path.
    #[must_use]
    pub fn new(
        routing_engine_id: Uuid,
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        estimated_cost: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            routing_engine_id,
            from_address: from_address.into(),
            to_address: to_address.into(),
            intermediate_addresses: Vec::new(),
            path_length: 1,
            estimated_cost,
            estimated_time_seconds: 0,
            liquidity_score: 0,
            usage_count: 0,
            success_count: 0,
            failure_count: 0,
            last_used: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// `success_count / usage_count * 100`, zero when unused.
    #[must_use]
    pub fn success_rate(&self) -> Decimal {
        ratio_or_zero(
            Decimal::from(self.success_count),
            Decimal::from(self.usage_count),
        )
        .saturating_mul(HUNDRED)
    }

    /// Validates addresses and score.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        validate_address(&self.from_address)?;
        validate_address(&self.to_address)?;
        for hop in &self.intermediate_addresses {
            validate_address(hop)?;
        }
        if self.liquidity_score > 100 {
            return Err(DomainError::invalid_field(
                "liquidity_score",
                "must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RoutingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}→{} ({} hops)",
            abbreviate(&self.from_address),
            abbreviate(&self.to_address),
            self.path_length
        )
    }
}

impl_record!(
    RoutingPath,
    table = "maythetoken_routing_path",
    plural = "routing paths",
    listed_by = created_at,
    updated = updated_at,
    validate = RoutingPath::validate,
    keys = |p| vec![key(
        "engine_from_to",
        format!("{}/{}/{}", p.routing_engine_id, p.from_address, p.to_address)
    )]
);

// ============================================================================
// Liquidity
// ============================================================================

/// A liquidity pool for a trading pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPool {
    /// Primary key.
    pub id: Uuid,
    /// Pair traded in the pool.
    pub trading_pair_id: Uuid,
    /// Name, unique per pair.
    pub name: String,
    /// Pool contract address, unique.
    pub pool_address: String,
    /// Base-side reserve.
    pub base_reserve: Decimal,
    /// Quote-side reserve.
    pub quote_reserve: Decimal,
    /// Total liquidity.
    pub total_liquidity: Decimal,
    /// Swap fee percentage.
    pub fee_rate: Decimal,
    /// Open for swaps.
    pub is_active: bool,
    /// 24h volume.
    pub volume_24h: Decimal,
    /// 24h fees.
    pub fees_earned_24h: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl LiquidityPool {
    /// Creates an empty active pool.
    #[must_use]
    pub fn new(
        trading_pair_id: Uuid,
        name: impl Into<String>,
        pool_address: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            trading_pair_id,
            name: name.into(),
            pool_address: pool_address.into(),
            base_reserve: Decimal::ZERO,
            quote_reserve: Decimal::ZERO,
            total_liquidity: Decimal::ZERO,
            fee_rate: Decimal::new(3, 1),
            is_active: true,
            volume_24h: Decimal::ZERO,
            fees_earned_24h: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Spot price, `quote_reserve / base_reserve`, zero on an empty base side.
    ///
    /// Saturates at [`Decimal::MAX`] when the quotient does not fit.
    #[must_use]
    pub fn price(&self) -> Decimal {
        ratio_or_zero(self.quote_reserve, self.base_reserve)
    }

    /// Validates address, reserves and fee.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        validate_address(&self.pool_address)?;
        ensure_non_negative("base_reserve", self.base_reserve)?;
        ensure_non_negative("quote_reserve", self.quote_reserve)?;
        ensure_percentage("fee_rate", self.fee_rate)?;
        Ok(())
    }
}

impl_record!(
    LiquidityPool,
    table = "maythetoken_liquidity_pool",
    plural = "liquidity pools",
    listed_by = created_at,
    updated = updated_at,
    validate = LiquidityPool::validate,
    keys = |p| vec![
        key("pool_address", p.pool_address.to_lowercase()),
        key("pair_name", format!("{}/{}", p.trading_pair_id, p.name)),
    ]
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::record::{ExclusiveFlag, Record};

    const POOL: &str = "0x1111111111111111111111111111111111111111";

    fn limit_order(quantity: i64) -> TradeOrder {
        TradeOrder::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            OrderType::Limit,
            OrderSide::Buy,
            Decimal::from(quantity),
            Some(Decimal::from(2)),
        )
    }

    #[test]
    fn pair_defaults() {
        let pair = TradingPair::new("MTT", "USD");
        assert_eq!(pair.symbol, "MTT/USD");
        assert_eq!(pair.maker_fee, Decimal::new(1, 1));
        assert_eq!(pair.taker_fee, Decimal::new(2, 1));
        assert_eq!(pair.natural_keys().len(), 2);
    }

    #[test]
    fn remaining_derived_on_prepare() {
        let mut order = limit_order(10);
        order.filled_quantity = Decimal::from(4);
        order.prepare(Utc::now());
        assert_eq!(order.remaining_quantity, Decimal::from(6));
    }

    #[test]
    fn fills_average_price() {
        let mut order = limit_order(10);
        order.record_fill(Decimal::from(4), Decimal::from(2)).unwrap();
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        order.record_fill(Decimal::from(6), Decimal::from(3)).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.total_value, Decimal::from(26));
        assert_eq!(order.average_price, Some(Decimal::new(26, 1)));
        assert!(order.remaining_quantity.is_zero());
        assert!(order.executed_at.is_some());
    }

    #[test]
    fn overfill_rejected() {
        let mut order = limit_order(5);
        let err = order.record_fill(Decimal::from(6), Decimal::ONE).unwrap_err();
        assert!(matches!(err, DomainError::Overfill { .. }));
        assert!(order.filled_quantity.is_zero());
    }

    #[test]
    fn filled_order_is_terminal() {
        let mut order = limit_order(1);
        order.record_fill(Decimal::ONE, Decimal::ONE).unwrap();
        assert!(order.record_fill(Decimal::ONE, Decimal::ONE).is_err());
    }

    #[test]
    fn limit_order_requires_price() {
        let mut order = limit_order(1);
        order.price = None;
        assert!(order.validate().is_err());
        order.order_type = OrderType::Market;
        assert!(order.validate().is_ok());
    }

    #[test]
    fn engine_flag_is_global() {
        let mut engine = RoutingEngine::new("primary", RoutingStrategy::Direct);
        engine.is_default = true;
        assert_eq!(engine.exclusive_flag(), Some(ExclusiveFlag::global(true)));
        engine.clear_exclusive_flag();
        assert!(!engine.is_default);
    }

    #[test]
    fn engine_multiplier_floor() {
        let mut engine = RoutingEngine::new("primary", RoutingStrategy::Direct);
        engine.hop_fee_multiplier = Decimal::new(9, 1);
        assert!(engine.validate().is_err());
    }

    #[test]
    fn path_success_rate() {
        let mut path = RoutingPath::new(Uuid::new_v4(), POOL, POOL, Decimal::ONE);
        assert_eq!(path.success_rate(), Decimal::ZERO);
        path.usage_count = 4;
        path.success_count = 3;
        assert_eq!(path.success_rate(), Decimal::from(75));
    }

    #[test]
    fn pool_price() {
        let mut pool = LiquidityPool::new(Uuid::new_v4(), "main", POOL);
        assert_eq!(pool.price(), Decimal::ZERO);
        pool.base_reserve = Decimal::from(200);
        pool.quote_reserve = Decimal::from(50);
        assert_eq!(pool.price(), Decimal::new(25, 2));
    }

    #[test]
    fn huge_pool_price_saturates() {
        let mut pool = LiquidityPool::new(Uuid::new_v4(), "deep", POOL);
        pool.quote_reserve = Decimal::MAX;
        pool.base_reserve = Decimal::new(1, 10);
        assert_eq!(pool.price(), Decimal::MAX);
    }
}
