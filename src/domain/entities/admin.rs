//! # Admin and ERP Records
//!
//! System configuration, merchant ERP integrations and their sync logs,
//! admin panels with their UI components, guided gateway setups and
//! system alerts.

use crate::domain::entities::record::{ExclusiveFlag, impl_record, key};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::chain::validate_address;
use crate::domain::value_objects::choices::choice_enum;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

choice_enum! {
    /// How a configuration value is interpreted.
    pub enum ConfigDataType("data_type") = String {
        String = "STRING" => "String",
        Integer = "INTEGER" => "Integer",
        Decimal = "DECIMAL" => "Decimal",
        Boolean = "BOOLEAN" => "Boolean",
        Json = "JSON" => "JSON",
    }
}

choice_enum! {
    /// ERP product.
    pub enum ErpIntegrationType("integration_type") {
        Sap = "SAP" => "SAP ERP",
        Oracle = "ORACLE" => "Oracle ERP",
        Dynamics = "DYNAMICS" => "Microsoft Dynamics",
        Netsuite = "NETSUITE" => "NetSuite",
        Quickbooks = "QUICKBOOKS" => "QuickBooks",
        Custom = "CUSTOM" => "Custom ERP",
    }
}

choice_enum! {
    /// ERP integration status.
    pub enum ErpStatus("status") = Inactive {
        Active = "ACTIVE" => "Active",
        Inactive = "INACTIVE" => "Inactive",
        Error = "ERROR" => "Error",
        Syncing = "SYNCING" => "Syncing",
    }
}

choice_enum! {
    /// What an ERP sync run covered.
    pub enum SyncType("sync_type") {
        Orders = "ORDERS" => "Orders",
        Customers = "CUSTOMERS" => "Customers",
        Products = "PRODUCTS" => "Products",
        Payments = "PAYMENTS" => "Payments",
        Inventory = "INVENTORY" => "Inventory",
    }
}

choice_enum! {
    /// Outcome of an ERP sync run.
    pub enum SyncStatus("status") {
        Success = "SUCCESS" => "Success",
        Partial = "PARTIAL" => "Partial Success",
        Failed = "FAILED" => "Failed",
        Skipped = "SKIPPED" => "Skipped",
    }
}

choice_enum! {
    /// Kind of admin panel.
    pub enum PanelType("panel_type") {
        Dashboard = "DASHBOARD" => "Dashboard",
        Analytics = "ANALYTICS" => "Analytics",
        Reporting = "REPORTING" => "Reporting",
        Monitoring = "MONITORING" => "Monitoring",
        Configuration = "CONFIGURATION" => "Configuration",
    }
}

choice_enum! {
    /// Access level required for a panel.
    pub enum AccessLevel("required_access_level") {
        SuperAdmin = "SUPER_ADMIN" => "Super Admin",
        Admin = "ADMIN" => "Admin",
        Manager = "MANAGER" => "Manager",
        Operator = "OPERATOR" => "Operator",
        ReadOnly = "READ_ONLY" => "Read Only",
    }
}

choice_enum! {
    /// UI component kind.
    pub enum ComponentType("component_type") {
        Widget = "WIDGET" => "Widget",
        Chart = "CHART" => "Chart",
        Table = "TABLE" => "Table",
        Form = "FORM" => "Form",
        Button = "BUTTON" => "Button",
        Menu = "MENU" => "Menu",
        Modal = "MODAL" => "Modal",
    }
}

choice_enum! {
    /// Gateway setup flavour.
    pub enum SetupType("setup_type") {
        Quick = "QUICK_SETUP" => "Quick Setup",
        Advanced = "ADVANCED_SETUP" => "Advanced Setup",
        Custom = "CUSTOM_SETUP" => "Custom Setup",
    }
}

choice_enum! {
    /// Gateway setup progress.
    pub enum SetupStatus("status") = Pending {
        Pending = "PENDING" => "Pending",
        InProgress = "IN_PROGRESS" => "In Progress",
        Completed = "COMPLETED" => "Completed",
        Failed = "FAILED" => "Failed",
        Cancelled = "CANCELLED" => "Cancelled",
    }
}

choice_enum! {
    /// Alert severity.
    pub enum AlertType("alert_type") {
        Info = "INFO" => "Information",
        Warning = "WARNING" => "Warning",
        Error = "ERROR" => "Error",
        Critical = "CRITICAL" => "Critical",
    }
}

choice_enum! {
    /// Alert category.
    pub enum AlertCategory("category") {
        System = "SYSTEM" => "System",
        Security = "SECURITY" => "Security",
        Payment = "PAYMENT" => "Payment",
        Maintenance = "MAINTENANCE" => "Maintenance",
        Performance = "PERFORMANCE" => "Performance",
    }
}

choice_enum! {
    /// Alert handling status.
    pub enum AlertStatus("status") = Active {
        Active = "ACTIVE" => "Active",
        Acknowledged = "ACKNOWLEDGED" => "Acknowledged",
        Resolved = "RESOLVED" => "Resolved",
        Dismissed = "DISMISSED" => "Dismissed",
    }
}

// ============================================================================
// System configuration
// ============================================================================

/// A global configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    /// Primary key.
    pub id: Uuid,
    /// Unique configuration key.
    pub key: String,
    /// Raw value.
    pub value: String,
    /// Interpretation of `value`.
    pub data_type: ConfigDataType,
    /// Description.
    pub description: String,
    /// Value is stored encrypted.
    pub is_encrypted: bool,
    /// Readable by the frontend.
    pub is_public: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last editor.
    pub updated_by_id: Uuid,
}

impl SystemConfiguration {
    /// Creates a private string entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>, updated_by_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            value: value.into(),
            data_type: ConfigDataType::default(),
            description: String::new(),
            is_encrypted: false,
            is_public: false,
            created_at: now,
            updated_at: now,
            updated_by_id,
        }
    }

    /// Parses `value` according to `data_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidField`] when `value` does not parse.
    pub fn typed_value(&self) -> DomainResult<serde_json::Value> {
        let invalid = |reason: String| DomainError::invalid_field("value", reason);
        match self.data_type {
            ConfigDataType::String => Ok(serde_json::Value::String(self.value.clone())),
            ConfigDataType::Integer => self
                .value
                .trim()
                .parse::<i64>()
                .map(serde_json::Value::from)
                .map_err(|e| invalid(e.to_string())),
            ConfigDataType::Decimal => Decimal::from_str(self.value.trim())
                .map(|d| serde_json::Value::String(d.to_string()))
                .map_err(|e| invalid(e.to_string())),
            ConfigDataType::Boolean => match self.value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(serde_json::Value::Bool(true)),
                "false" | "0" | "no" => Ok(serde_json::Value::Bool(false)),
                other => Err(invalid(format!("not a boolean: {other}"))),
            },
            ConfigDataType::Json => {
                serde_json::from_str(&self.value).map_err(|e| invalid(e.to_string()))
            }
        }
    }

    /// Validates the key and that the value matches its data type.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        if self.key.trim().is_empty() || self.key.chars().count() > 100 {
            return Err(DomainError::invalid_field("key", "must be 1 to 100 characters"));
        }
        if !self.is_encrypted {
            self.typed_value()?;
        }
        Ok(())
    }
}

impl_record!(
    SystemConfiguration,
    table = "canasale_config",
    plural = "configuration entries",
    listed_by = created_at,
    updated = updated_at,
    validate = SystemConfiguration::validate,
    keys = |c| vec![key("key", &c.key)]
);

// ============================================================================
// ERP integration
// ============================================================================

/// A merchant's ERP connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpIntegration {
    /// Primary key.
    pub id: Uuid,
    /// Owning merchant.
    pub merchant_id: Uuid,
    /// ERP product.
    pub integration_type: ErpIntegrationType,
    /// Name, unique per merchant.
    pub name: String,
    /// ERP API endpoint.
    pub api_endpoint: String,
    /// ERP API key. Never exposed by the API.
    pub api_key: String,
    /// ERP API secret. Never exposed by the API.
    pub api_secret: String,
    /// Minutes between syncs.
    pub sync_interval_minutes: u32,
    /// Sync automatically.
    pub auto_sync: bool,
    /// Sync orders.
    pub sync_orders: bool,
    /// Sync customers.
    pub sync_customers: bool,
    /// Sync products.
    pub sync_products: bool,
    /// Sync payments.
    pub sync_payments: bool,
    /// Status.
    pub status: ErpStatus,
    /// Last sync time.
    pub last_sync: Option<DateTime<Utc>>,
    /// Last error.
    pub last_error: String,
    /// Successful syncs.
    pub sync_count: u32,
    /// Failed syncs.
    pub error_count: u32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl ErpIntegration {
    /// Creates an inactive integration syncing everything hourly.
    #[must_use]
    pub fn new(
        merchant_id: Uuid,
        integration_type: ErpIntegrationType,
        name: impl Into<String>,
        api_endpoint: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            merchant_id,
            integration_type,
            name: name.into(),
            api_endpoint: api_endpoint.into(),
            api_key: String::new(),
            api_secret: String::new(),
            sync_interval_minutes: 60,
            auto_sync: true,
            sync_orders: true,
            sync_customers: true,
            sync_products: true,
            sync_payments: true,
            status: ErpStatus::default(),
            last_sync: None,
            last_error: String::new(),
            sync_count: 0,
            error_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates the endpoint URL and interval.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_url("api_endpoint", &self.api_endpoint)?;
        if self.sync_interval_minutes == 0 {
            return Err(DomainError::invalid_field(
                "sync_interval_minutes",
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl_record!(
    ErpIntegration,
    table = "canasale_erp_integration",
    plural = "ERP integrations",
    listed_by = created_at,
    updated = updated_at,
    validate = ErpIntegration::validate,
    keys = |i| vec![key("merchant_name", format!("{}/{}", i.merchant_id, i.name))]
);

/// One ERP synchronization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErpSyncLog {
    /// Primary key.
    pub id: Uuid,
    /// Integration that ran.
    pub erp_integration_id: Uuid,
    /// What was synced.
    pub sync_type: SyncType,
    /// Records seen.
    pub records_processed: u32,
    /// Records synced.
    pub records_success: u32,
    /// Records failed.
    pub records_failed: u32,
    /// Outcome.
    pub status: SyncStatus,
    /// Error detail.
    pub error_message: String,
    /// Detailed run information.
    pub sync_data: serde_json::Value,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// End time.
    pub completed_at: Option<DateTime<Utc>>,
    /// Duration in seconds.
    pub duration_seconds: Option<u32>,
}

impl ErpSyncLog {
    /// Starts a log entry now.
    #[must_use]
    pub fn new(erp_integration_id: Uuid, sync_type: SyncType, status: SyncStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            erp_integration_id,
            sync_type,
            records_processed: 0,
            records_success: 0,
            records_failed: 0,
            status,
            error_message: String::new(),
            sync_data: serde_json::Value::Object(serde_json::Map::new()),
            started_at: Utc::now(),
            completed_at: None,
            duration_seconds: None,
        }
    }
}

impl_record!(
    ErpSyncLog,
    table = "canasale_erp_sync_log",
    plural = "sync logs",
    listed_by = started_at,
    prepare = |l, _now| {
        if let Some(done) = l.completed_at {
            let secs = (done - l.started_at).num_seconds().max(0);
            l.duration_seconds = u32::try_from(secs).ok();
        }
    }
);

// ============================================================================
// Admin panels
// ============================================================================

/// An admin dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminPanel {
    /// Primary key.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// Kind of panel.
    pub panel_type: PanelType,
    /// Description.
    pub description: String,
    /// Required access level.
    pub required_access_level: AccessLevel,
    /// Users granted access.
    pub allowed_user_ids: Vec<Uuid>,
    /// Groups granted access.
    pub allowed_groups: Vec<String>,
    /// Panel configuration.
    pub config_data: serde_json::Value,
    /// Layout configuration.
    pub layout_data: serde_json::Value,
    /// Shown.
    pub is_active: bool,
    /// Landing panel; at most one.
    pub is_default: bool,
    /// Display order.
    pub sort_order: u16,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Creator.
    pub created_by_id: Uuid,
}

impl AdminPanel {
    /// Creates an active, non-default panel.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        panel_type: PanelType,
        required_access_level: AccessLevel,
        created_by_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            panel_type,
            description: String::new(),
            required_access_level,
            allowed_user_ids: Vec::new(),
            allowed_groups: Vec::new(),
            config_data: serde_json::Value::Object(serde_json::Map::new()),
            layout_data: serde_json::Value::Object(serde_json::Map::new()),
            is_active: true,
            is_default: false,
            sort_order: 100,
            created_at: now,
            updated_at: now,
            created_by_id,
        }
    }
}

impl_record!(
    AdminPanel,
    table = "canasale_admin_panel",
    plural = "admin panels",
    listed_by = created_at,
    updated = updated_at,
    keys = |p| vec![key("name", &p.name)],
    exclusive = |_p| (ExclusiveFlag::GLOBAL_OWNER, is_default)
);

/// A widget placed on an admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebUiComponent {
    /// Primary key.
    pub id: Uuid,
    /// Owning panel.
    pub admin_panel_id: Uuid,
    /// Name, unique per panel.
    pub name: String,
    /// Component kind.
    pub component_type: ComponentType,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Component configuration.
    pub config_data: serde_json::Value,
    /// API endpoint feeding the component.
    pub data_source: String,
    /// Refresh interval in seconds.
    pub refresh_interval_seconds: Option<u32>,
    /// Grid column.
    pub position_x: u16,
    /// Grid row.
    pub position_y: u16,
    /// Width in grid cells.
    pub width: u16,
    /// Height in grid cells.
    pub height: u16,
    /// Enabled.
    pub is_active: bool,
    /// Visible.
    pub is_visible: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl WebUiComponent {
    /// Creates a 1x1 component at the origin.
    #[must_use]
    pub fn new(admin_panel_id: Uuid, name: impl Into<String>, component_type: ComponentType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            admin_panel_id,
            name: name.into(),
            component_type,
            title: String::new(),
            description: String::new(),
            config_data: serde_json::Value::Object(serde_json::Map::new()),
            data_source: String::new(),
            refresh_interval_seconds: None,
            position_x: 0,
            position_y: 0,
            width: 1,
            height: 1,
            is_active: true,
            is_visible: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl_record!(
    WebUiComponent,
    table = "canasale_web_ui_component",
    plural = "UI components",
    listed_by = created_at,
    updated = updated_at,
    keys = |c| vec![key("panel_name", format!("{}/{}", c.admin_panel_id, c.name))]
);

// ============================================================================
// Gateway setup and alerts
// ============================================================================

/// Guided setup of a merchant's non-custodial gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentGatewaySetup {
    /// Primary key.
    pub id: Uuid,
    /// Merchant being set up.
    pub merchant_id: Uuid,
    /// Setup flavour.
    pub setup_type: SetupType,
    /// Setup configuration.
    pub setup_config: serde_json::Value,
    /// Current step, 1-based.
    pub current_step: u16,
    /// Number of steps.
    pub total_steps: u16,
    /// Completed step numbers.
    pub completed_steps: Vec<u16>,
    /// Settlement address.
    pub wallet_address: Option<String>,
    /// Issued API key.
    pub api_key: Option<String>,
    /// Webhook URL.
    pub webhook_url: Option<String>,
    /// Progress status.
    pub status: SetupStatus,
    /// Error detail.
    pub error_message: String,
    /// `completed_steps / total_steps`, in percent.
    pub completion_percentage: u8,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentGatewaySetup {
    /// Starts a five-step setup.
    #[must_use]
    pub fn new(merchant_id: Uuid, setup_type: SetupType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            merchant_id,
            setup_type,
            setup_config: serde_json::Value::Object(serde_json::Map::new()),
            current_step: 1,
            total_steps: 5,
            completed_steps: Vec::new(),
            wallet_address: None,
            api_key: None,
            webhook_url: None,
            status: SetupStatus::default(),
            error_message: String::new(),
            completion_percentage: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Marks `step` done and advances to the next open step.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidField`] for a step outside `1..=total_steps`.
    pub fn complete_step(&mut self, step: u16, now: DateTime<Utc>) -> DomainResult<()> {
        if step == 0 || step > self.total_steps {
            return Err(DomainError::invalid_field(
                "current_step",
                format!("step {step} is outside 1..={}", self.total_steps),
            ));
        }
        if !self.completed_steps.contains(&step) {
            self.completed_steps.push(step);
            self.completed_steps.sort_unstable();
        }
        self.refresh_progress();
        if usize::from(self.total_steps) == self.completed_steps.len() {
            self.status = SetupStatus::Completed;
            self.completed_at = Some(now);
        } else {
            self.status = SetupStatus::InProgress;
            self.current_step = (1..=self.total_steps)
                .find(|s| !self.completed_steps.contains(s))
                .unwrap_or(self.total_steps);
        }
        Ok(())
    }

    fn refresh_progress(&mut self) {
        let done = self.completed_steps.len().min(usize::from(self.total_steps));
        let pct = (done * 100)
            .checked_div(usize::from(self.total_steps))
            .unwrap_or(0);
        self.completion_percentage = u8::try_from(pct).unwrap_or(100);
    }

    /// Validates the settlement address and step counters.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(address) = &self.wallet_address {
            validate_address(address)?;
        }
        if let Some(url) = &self.webhook_url {
            ensure_url("webhook_url", url)?;
        }
        if self.total_steps == 0 || self.current_step > self.total_steps {
            return Err(DomainError::invalid_field(
                "current_step",
                "must lie within total_steps",
            ));
        }
        Ok(())
    }
}

impl_record!(
    PaymentGatewaySetup,
    table = "canasale_gateway_setup",
    plural = "gateway setups",
    listed_by = created_at,
    updated = updated_at,
    validate = PaymentGatewaySetup::validate,
    prepare = |s, _now| {
        s.refresh_progress();
    }
);

/// An alert raised for administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAlert {
    /// Primary key.
    pub id: Uuid,
    /// Severity.
    pub alert_type: AlertType,
    /// Category.
    pub category: AlertCategory,
    /// Title.
    pub title: String,
    /// Message.
    pub message: String,
    /// Component that raised it.
    pub source_component: String,
    /// Related record id.
    pub related_object_id: Option<Uuid>,
    /// Related record type.
    pub related_object_type: String,
    /// Handling status.
    pub status: AlertStatus,
    /// Assignee.
    pub assigned_to_id: Option<Uuid>,
    /// Acknowledging user.
    pub acknowledged_by_id: Option<Uuid>,
    /// Resolving user.
    pub resolved_by_id: Option<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Acknowledgement time.
    pub acknowledged_at: Option<DateTime<Utc>>,
    /// Resolution time.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Auto-resolve delay in hours.
    pub auto_resolve_after_hours: Option<u32>,
}

impl SystemAlert {
    /// Creates an active alert.
    #[must_use]
    pub fn new(
        alert_type: AlertType,
        category: AlertCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            alert_type,
            category,
            title: title.into(),
            message: message.into(),
            source_component: String::new(),
            related_object_id: None,
            related_object_type: String::new(),
            status: AlertStatus::default(),
            assigned_to_id: None,
            acknowledged_by_id: None,
            resolved_by_id: None,
            created_at: Utc::now(),
            acknowledged_at: None,
            resolved_at: None,
            auto_resolve_after_hours: None,
        }
    }

    /// Acknowledges the alert.
    pub fn acknowledge(&mut self, user_id: Uuid, now: DateTime<Utc>) {
        self.status = AlertStatus::Acknowledged;
        self.acknowledged_by_id = Some(user_id);
        self.acknowledged_at = Some(now);
    }

    /// Resolves the alert.
    pub fn resolve(&mut self, user_id: Uuid, now: DateTime<Utc>) {
        self.status = AlertStatus::Resolved;
        self.resolved_by_id = Some(user_id);
        self.resolved_at = Some(now);
    }
}

impl_record!(
    SystemAlert,
    table = "canasale_system_alert",
    plural = "alerts",
    listed_by = created_at
);

fn ensure_url(field: &'static str, value: &str) -> DomainResult<()> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(DomainError::invalid_field(field, "must be an http(s) URL")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::record::Record;

    #[test]
    fn typed_config_values() {
        let mut entry = SystemConfiguration::new("max_retries", "3", Uuid::new_v4());
        entry.data_type = ConfigDataType::Integer;
        assert_eq!(entry.typed_value().unwrap(), serde_json::json!(3));

        entry.data_type = ConfigDataType::Boolean;
        assert!(entry.validate().is_err());

        entry.value = "{\"a\": 1}".to_string();
        entry.data_type = ConfigDataType::Json;
        assert_eq!(entry.typed_value().unwrap()["a"], 1);
    }

    #[test]
    fn config_data_type_default() {
        assert_eq!(ConfigDataType::default(), ConfigDataType::String);
    }

    #[test]
    fn erp_requires_url() {
        let bad = ErpIntegration::new(Uuid::new_v4(), ErpIntegrationType::Sap, "sap", "sap.local");
        assert!(bad.validate().is_err());
        let good = ErpIntegration::new(
            Uuid::new_v4(),
            ErpIntegrationType::Sap,
            "sap",
            "https://sap.example.com/api",
        );
        assert!(good.validate().is_ok());
        assert_eq!(good.status, ErpStatus::Inactive);
    }

    #[test]
    fn sync_log_duration() {
        let mut log = ErpSyncLog::new(Uuid::new_v4(), SyncType::Orders, SyncStatus::Success);
        log.completed_at = Some(log.started_at + chrono::Duration::seconds(42));
        log.prepare(Utc::now());
        assert_eq!(log.duration_seconds, Some(42));
    }

    #[test]
    fn panel_flag_is_global() {
        let mut panel = AdminPanel::new("ops", PanelType::Dashboard, AccessLevel::Admin, Uuid::new_v4());
        panel.is_default = true;
        assert_eq!(panel.exclusive_flag(), Some(ExclusiveFlag::global(true)));
    }

    #[test]
    fn setup_steps_progress() {
        let mut setup = PaymentGatewaySetup::new(Uuid::new_v4(), SetupType::Quick);
        let now = Utc::now();
        setup.complete_step(1, now).unwrap();
        setup.complete_step(2, now).unwrap();
        assert_eq!(setup.completion_percentage, 40);
        assert_eq!(setup.current_step, 3);
        assert_eq!(setup.status, SetupStatus::InProgress);
        for step in 3..=5 {
            setup.complete_step(step, now).unwrap();
        }
        assert_eq!(setup.status, SetupStatus::Completed);
        assert_eq!(setup.completion_percentage, 100);
        assert!(setup.complete_step(6, now).is_err());
    }

    #[test]
    fn alert_lifecycle() {
        let mut alert = SystemAlert::new(AlertType::Warning, AlertCategory::Payment, "Slow", "p99 up");
        let user = Uuid::new_v4();
        alert.acknowledge(user, Utc::now());
        assert_eq!(alert.status, AlertStatus::Acknowledged);
        alert.resolve(user, Utc::now());
        assert_eq!(alert.resolved_by_id, Some(user));
    }
}
