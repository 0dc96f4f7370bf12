//! 实体列表的本地合并操作
//!
//! 同步器的纯逻辑部分：列表的展示顺序就是最近一次全量加载的插入顺序，
//! 之后的创建追加到尾部、更新原位合并、删除只移除命中的那一条。

use crate::protocol::Resource;

/// 把已确认的补丁合并进 `id` 命中的条目，保持位置与列表长度不变。
///
/// 返回是否有条目被命中；未命中时列表不发生任何变化。
pub fn merge_patch<R: Resource>(items: &mut [R], id: &str, patch: &R::Patch) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            item.apply(patch);
            true
        }
        None => false,
    }
}

/// 移除 `id` 命中的条目，其余条目的相对顺序不变。
pub fn remove_by_id<R: Resource>(items: &mut Vec<R>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{OrderPatch, RoutePatch};
    use crate::{Order, OrderStatus, Route, TrafficLevel};

    fn route(id: &str, route_id: &str, km: f64) -> Route {
        Route {
            id: id.to_string(),
            route_id: route_id.to_string(),
            distance_km: km,
            traffic_level: TrafficLevel::Low,
            base_time_minutes: 20,
        }
    }

    fn order(id: &str, order_id: &str) -> Order {
        Order {
            id: id.to_string(),
            order_id: order_id.to_string(),
            value_rs: 500.0,
            assigned_route_id: "R1".to_string(),
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn merge_patch_keeps_length_order_and_untouched_fields() {
        let mut items = vec![route("a", "R1", 5.0), route("b", "R2", 8.0), route("c", "R3", 3.0)];
        let hit = merge_patch(
            &mut items,
            "b",
            &RoutePatch {
                distance_km: 11.0,
                traffic_level: TrafficLevel::High,
                base_time_minutes: 55,
            },
        );
        assert!(hit);
        assert_eq!(items.len(), 3);
        // 位置不变，不可变编号不变
        assert_eq!(items[1].id, "b");
        assert_eq!(items[1].route_id, "R2");
        assert_eq!(items[1].distance_km, 11.0);
        // 相邻条目原封不动
        assert_eq!(items[0], route("a", "R1", 5.0));
        assert_eq!(items[2], route("c", "R3", 3.0));
    }

    #[test]
    fn merge_patch_on_unknown_id_is_a_no_op() {
        let mut items = vec![order("a", "O1"), order("b", "O2")];
        let snapshot = items.clone();
        let hit = merge_patch(
            &mut items,
            "missing",
            &OrderPatch {
                value_rs: 1.0,
                assigned_route_id: "R9".to_string(),
                status: OrderStatus::Delivered,
            },
        );
        assert!(!hit);
        assert_eq!(items, snapshot);
    }

    #[test]
    fn remove_by_id_drops_only_the_matching_entry() {
        let mut items = vec![order("a", "O1"), order("b", "O2"), order("c", "O3")];
        assert!(remove_by_id(&mut items, "b"));
        assert_eq!(
            items.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
            ["a", "c"]
        );
        assert!(!remove_by_id(&mut items, "b"));
        assert_eq!(items.len(), 2);
    }
}
