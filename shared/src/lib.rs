use serde::{Deserialize, Serialize};

pub mod collection;
pub mod projection;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 当前登录操作员的资料，由 `GET /auth/me` 返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    /// 服务端分配的主键
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub current_shift_hours: f64,
    pub is_active: bool,
    #[serde(default)]
    pub past_7_day_hours: Vec<f64>,
}

/// 路线的交通状况等级
///
/// 同时作为 `fuel_cost_breakdown` 映射的键在线上传输。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrafficLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    pub const ALL: [TrafficLevel; 3] = [TrafficLevel::Low, TrafficLevel::Medium, TrafficLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLevel::Low => "Low",
            TrafficLevel::Medium => "Medium",
            TrafficLevel::High => "High",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Low" => Some(TrafficLevel::Low),
            "Medium" => Some(TrafficLevel::Medium),
            "High" => Some(TrafficLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(rename = "_id")]
    pub id: String,
    /// 操作员可见的唯一编号，创建后不可变更
    pub route_id: String,
    pub distance_km: f64,
    pub traffic_level: TrafficLevel,
    pub base_time_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Delivered];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Delivered => "Delivered",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Pending" => Some(OrderStatus::Pending),
            "Delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    /// 操作员可见的唯一编号，创建后不可变更
    pub order_id: String,
    pub value_rs: f64,
    /// 引用 `Route::route_id`；有效性由服务端校验
    pub assigned_route_id: String,
    pub status: OrderStatus,
}

// =========================================================
// 模拟结果 (Simulation Result)
// =========================================================

/// 一次模拟的汇总指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationKpis {
    pub total_profit: f64,
    /// 0 到 100 的百分比
    pub efficiency: f64,
    pub total_deliveries: u32,
    pub on_time_deliveries: u32,
    /// 线上格式是 JSON 对象；键的集合与顺序必须原样保留
    #[serde(with = "fuel_map")]
    pub fuel_cost_breakdown: Vec<(TrafficLevel, f64)>,
}

/// 模拟结果中的单个订单结局
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOutcome {
    pub order_id: String,
    pub value_rs: f64,
    pub assigned_driver: String,
    pub on_time: bool,
    pub profit: f64,
}

/// 服务端返回的完整模拟结果
///
/// 客户端收到后只读，所有报表视图均由它派生（见 `projection`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[serde(rename = "_id")]
    pub id: String,
    /// RFC 3339 字符串，仅用于展示，客户端不解析语义
    pub created_at: String,
    pub kpis: SimulationKpis,
    pub per_order: Vec<OrderOutcome>,
}

// =========================================================
// 有序燃油成本映射的 serde 实现
// =========================================================

/// `fuel_cost_breakdown` 的线上格式是 `{"Low": 1.0, ...}`。
/// 标准 map 类型无法保证键序，这里手写 serde 以保留服务端给出的顺序。
mod fuel_map {
    use super::TrafficLevel;
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(entries: &[(TrafficLevel, f64)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (level, cost) in entries {
            map.serialize_entry(level.as_str(), cost)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(TrafficLevel, f64)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FuelMapVisitor;

        impl<'de> Visitor<'de> for FuelMapVisitor {
            type Value = Vec<(TrafficLevel, f64)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from traffic level to fuel cost")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(3));
                while let Some((key, cost)) = access.next_entry::<String, f64>()? {
                    let level = TrafficLevel::from_key(&key).ok_or_else(|| {
                        de::Error::unknown_variant(&key, &["Low", "Medium", "High"])
                    })?;
                    entries.push((level, cost));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(FuelMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_wire_format_round_trip() {
        let json = r#"{
            "_id": "64fa01",
            "name": "Amit",
            "email": "amit@logistics.com",
            "currentShiftHours": 6.5,
            "isActive": true,
            "past7DayHours": [7, 8, 6, 7, 8, 6, 5]
        }"#;
        let driver: Driver = serde_json::from_str(json).unwrap();
        assert_eq!(driver.id, "64fa01");
        assert_eq!(driver.current_shift_hours, 6.5);
        assert_eq!(driver.past_7_day_hours.len(), 7);

        let back = serde_json::to_value(&driver).unwrap();
        assert_eq!(back["_id"], "64fa01");
        assert_eq!(back["currentShiftHours"], 6.5);
        assert_eq!(back["isActive"], true);
    }

    #[test]
    fn driver_email_and_history_are_optional_on_the_wire() {
        let json = r#"{"_id":"x","name":"N","currentShiftHours":0,"isActive":false}"#;
        let driver: Driver = serde_json::from_str(json).unwrap();
        assert!(driver.email.is_none());
        assert!(driver.past_7_day_hours.is_empty());
    }

    #[test]
    fn route_wire_format() {
        let json = r#"{
            "_id": "r-1",
            "routeId": "R1",
            "distanceKm": 5,
            "trafficLevel": "Low",
            "baseTimeMinutes": 20
        }"#;
        let route: Route = serde_json::from_str(json).unwrap();
        assert_eq!(route.route_id, "R1");
        assert_eq!(route.distance_km, 5.0);
        assert_eq!(route.traffic_level, TrafficLevel::Low);
        assert_eq!(route.base_time_minutes, 20);
    }

    #[test]
    fn order_wire_format() {
        let json = r#"{
            "_id": "x1",
            "orderId": "O9",
            "valueRs": 500,
            "assignedRouteId": "R1",
            "status": "Pending"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, "O9");
        assert_eq!(order.value_rs, 500.0);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn fuel_cost_breakdown_preserves_server_key_order() {
        // 服务端按 High/Low/Medium 的顺序给出；重新序列化后顺序不变
        let json = r#"{
            "_id": "sim-1",
            "createdAt": "2025-08-07T09:30:00.000Z",
            "kpis": {
                "totalProfit": 12500.5,
                "efficiency": 80,
                "totalDeliveries": 10,
                "onTimeDeliveries": 8,
                "fuelCostBreakdown": {"High": 310.0, "Low": 125.0, "Medium": 240.0}
            },
            "perOrder": []
        }"#;
        let result: SimulationResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            result.kpis.fuel_cost_breakdown,
            vec![
                (TrafficLevel::High, 310.0),
                (TrafficLevel::Low, 125.0),
                (TrafficLevel::Medium, 240.0),
            ]
        );

        let back = serde_json::to_string(&result).unwrap();
        let high = back.find("\"High\"").unwrap();
        let low = back.find("\"Low\"").unwrap();
        let medium = back.find("\"Medium\"").unwrap();
        assert!(high < low && low < medium);
    }

    #[test]
    fn fuel_cost_breakdown_rejects_unknown_levels() {
        #[derive(serde::Deserialize)]
        struct Wrapper(#[serde(with = "super::fuel_map")] Vec<(TrafficLevel, f64)>);
        assert!(serde_json::from_str::<Wrapper>(r#"{"Gridlock": 1.0}"#).is_err());
    }

    #[test]
    fn simulation_per_order_round_trip() {
        let json = r#"{
            "orderId": "O3",
            "valueRs": 1200,
            "assignedDriver": "Priya",
            "onTime": false,
            "profit": -84.5
        }"#;
        let outcome: OrderOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.assigned_driver, "Priya");
        assert!(!outcome.on_time);
        assert_eq!(outcome.profit, -84.5);
    }
}
