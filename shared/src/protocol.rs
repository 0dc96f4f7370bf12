//! Wire protocol between the console and the logistics REST service.
//!
//! Each CRUD entity implements [`Resource`], which carries the endpoint
//! metadata and the draft/patch body types the generic synchronizer needs.
//! Immutable keys (`route_id`, `order_id`) are deliberately absent from the
//! patch types: an update request cannot carry them because the type cannot
//! express them.

use crate::{Driver, Order, OrderStatus, Route, TrafficLevel, UserProfile};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// =========================================================
// Endpoint paths
// =========================================================

pub const PATH_LOGIN: &str = "/auth/login";
pub const PATH_ME: &str = "/auth/me";
pub const PATH_SIMULATE: &str = "/simulate";
pub const PATH_SIMULATE_LATEST: &str = "/simulate/latest";

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` 成功响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// 失败响应的统一包装，服务端把可展示的消息放在 `error` 字段
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// =========================================================
// Simulation
// =========================================================

/// `POST /simulate` 请求参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub number_of_drivers: u32,
    /// "HH:MM"
    pub route_start_time: String,
    pub max_hours_per_driver: f64,
}

// =========================================================
// Resource trait
// =========================================================

/// 可被通用同步器管理的实体类型
///
/// `Draft` 是创建请求体（没有服务端主键），`Patch` 是更新请求体
/// （不含创建后不可变的业务编号）。`apply` 定义服务端确认成功后
/// 如何把补丁合并回本地条目。
pub trait Resource: Clone + PartialEq + Serialize + DeserializeOwned + 'static {
    /// 集合端点，如 `/drivers`；单条操作追加 `/{id}`
    const ENDPOINT: &'static str;
    /// 实体的中文显示名，用于提示消息
    const LABEL: &'static str;

    type Draft: Clone + Serialize + 'static;
    type Patch: Clone + Serialize + 'static;

    fn id(&self) -> &str;

    /// 把已被服务端确认的补丁合并进本地条目（未覆盖的字段保持原样）
    fn apply(&mut self, patch: &Self::Patch);
}

// =========================================================
// Driver
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub current_shift_hours: f64,
    pub is_active: bool,
    pub past_7_day_hours: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPatch {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub current_shift_hours: f64,
    pub is_active: bool,
    pub past_7_day_hours: Vec<f64>,
}

impl Resource for Driver {
    const ENDPOINT: &'static str = "/drivers";
    const LABEL: &'static str = "司机";

    type Draft = DriverDraft;
    type Patch = DriverPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &DriverPatch) {
        self.name = patch.name.clone();
        self.email = patch.email.clone();
        self.current_shift_hours = patch.current_shift_hours;
        self.is_active = patch.is_active;
        self.past_7_day_hours = patch.past_7_day_hours.clone();
    }
}

// =========================================================
// Route
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    pub route_id: String,
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    pub base_time_minutes: u32,
}

/// 没有 `route_id` 字段：编号创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePatch {
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    pub base_time_minutes: u32,
}

impl Resource for Route {
    const ENDPOINT: &'static str = "/routes";
    const LABEL: &'static str = "路线";

    type Draft = RouteDraft;
    type Patch = RoutePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &RoutePatch) {
        self.distance_km = patch.distance_km;
        self.traffic_level = patch.traffic_level;
        self.base_time_minutes = patch.base_time_minutes;
    }
}

// =========================================================
// Order
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub order_id: String,
    pub value_rs: f64,
    pub assigned_route_id: String,
    pub status: OrderStatus,
}

/// 没有 `order_id` 字段：编号创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub value_rs: f64,
    pub assigned_route_id: String,
    pub status: OrderStatus,
}

impl Resource for Order {
    const ENDPOINT: &'static str = "/orders";
    const LABEL: &'static str = "订单";

    type Draft = OrderDraft;
    type Patch = OrderPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &OrderPatch) {
        self.value_rs = patch.value_rs;
        self.assigned_route_id = patch.assigned_route_id.clone();
        self.status = patch.status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_patch_never_serializes_the_immutable_key() {
        let patch = RoutePatch {
            distance_km: 7.5,
            traffic_level: TrafficLevel::High,
            base_time_minutes: 45,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert!(!json.contains("routeId"));
        assert!(json.contains("distanceKm"));
        assert!(json.contains("trafficLevel"));
        assert!(json.contains("baseTimeMinutes"));
    }

    #[test]
    fn order_patch_never_serializes_the_immutable_key() {
        let patch = OrderPatch {
            value_rs: 900.0,
            assigned_route_id: "R2".to_string(),
            status: OrderStatus::Delivered,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert!(!json.contains("orderId"));
        assert!(json.contains("assignedRouteId"));
    }

    #[test]
    fn simulation_request_matches_wire_names() {
        let req = SimulationRequest {
            number_of_drivers: 5,
            route_start_time: "09:00".to_string(),
            max_hours_per_driver: 8.0,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["numberOfDrivers"], 5);
        assert_eq!(json["routeStartTime"], "09:00");
        assert_eq!(json["maxHoursPerDriver"], 8.0);
    }

    #[test]
    fn apply_merges_all_mutable_fields() {
        let mut route = Route {
            id: "r-1".to_string(),
            route_id: "R1".to_string(),
            distance_km: 5.0,
            traffic_level: TrafficLevel::Low,
            base_time_minutes: 20,
        };
        route.apply(&RoutePatch {
            distance_km: 9.0,
            traffic_level: TrafficLevel::Medium,
            base_time_minutes: 30,
        });
        assert_eq!(route.route_id, "R1");
        assert_eq!(route.distance_km, 9.0);
        assert_eq!(route.traffic_level, TrafficLevel::Medium);
        assert_eq!(route.base_time_minutes, 30);
    }

    #[test]
    fn error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
        let body: ErrorBody = serde_json::from_str(r#"{"error":"Route R9 not found"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("Route R9 not found"));
    }
}
