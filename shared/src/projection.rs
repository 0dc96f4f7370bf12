//! 模拟结果的只读投影
//!
//! 输入始终是 `Option<&SimulationResult>`：还没有任何模拟时所有投影返回
//! `None`，由调用方渲染"去运行一次"的引导，而不是空图表或异常。

use crate::{OrderOutcome, SimulationResult, TrafficLevel};

/// 准时/迟到两类的配送分布
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverySplit {
    pub on_time: u32,
    pub late: u32,
}

impl DeliverySplit {
    pub fn total(&self) -> u32 {
        self.on_time + self.late
    }
}

/// 订单明细的截断视图
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPreview {
    /// `per_order` 的前 `limit` 条，内容原样不动
    pub entries: Vec<OrderOutcome>,
    /// 还有更多条目，应提供完整明细页的入口
    pub has_more: bool,
}

/// 准时与迟到配送的两类分布
pub fn delivery_chart(result: Option<&SimulationResult>) -> Option<DeliverySplit> {
    let kpis = &result?.kpis;
    Some(DeliverySplit {
        on_time: kpis.on_time_deliveries,
        late: kpis.total_deliveries.saturating_sub(kpis.on_time_deliveries),
    })
}

/// 燃油成本按交通等级的带标签序列，键集合与顺序与服务端给出的一致
pub fn fuel_cost_chart(result: Option<&SimulationResult>) -> Option<Vec<(TrafficLevel, f64)>> {
    Some(result?.kpis.fuel_cost_breakdown.clone())
}

/// 订单明细的前 `limit` 条及是否截断
pub fn order_preview(result: Option<&SimulationResult>, limit: usize) -> Option<OrderPreview> {
    let per_order = &result?.per_order;
    Some(OrderPreview {
        entries: per_order.iter().take(limit).cloned().collect(),
        has_more: per_order.len() > limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimulationKpis;

    fn outcome(order_id: &str, on_time: bool) -> OrderOutcome {
        OrderOutcome {
            order_id: order_id.to_string(),
            value_rs: 500.0,
            assigned_driver: "Amit".to_string(),
            on_time,
            profit: 50.0,
        }
    }

    fn sample(total: u32, on_time: u32, orders: usize) -> SimulationResult {
        SimulationResult {
            id: "sim-1".to_string(),
            created_at: "2025-08-07T09:30:00.000Z".to_string(),
            kpis: SimulationKpis {
                total_profit: 10_000.0,
                efficiency: 80.0,
                total_deliveries: total,
                on_time_deliveries: on_time,
                fuel_cost_breakdown: vec![
                    (TrafficLevel::Low, 125.0),
                    (TrafficLevel::Medium, 240.0),
                    (TrafficLevel::High, 310.0),
                ],
            },
            per_order: (0..orders).map(|i| outcome(&format!("O{i}"), i % 2 == 0)).collect(),
        }
    }

    #[test]
    fn absent_result_yields_the_no_data_sentinel() {
        assert_eq!(delivery_chart(None), None);
        assert_eq!(fuel_cost_chart(None), None);
        assert_eq!(order_preview(None, 5), None);
    }

    #[test]
    fn delivery_chart_splits_on_time_and_late() {
        let result = sample(10, 8, 0);
        let split = delivery_chart(Some(&result)).unwrap();
        assert_eq!(split.on_time, 8);
        assert_eq!(split.late, 2);
        assert_eq!(split.total(), 10);
    }

    #[test]
    fn delivery_chart_never_underflows_on_inconsistent_kpis() {
        let result = sample(3, 5, 0);
        let split = delivery_chart(Some(&result)).unwrap();
        assert_eq!(split.late, 0);
    }

    #[test]
    fn fuel_cost_chart_preserves_key_set_and_order() {
        let result = sample(1, 1, 0);
        let series = fuel_cost_chart(Some(&result)).unwrap();
        assert_eq!(
            series,
            vec![
                (TrafficLevel::Low, 125.0),
                (TrafficLevel::Medium, 240.0),
                (TrafficLevel::High, 310.0),
            ]
        );
    }

    #[test]
    fn order_preview_truncates_and_flags_more() {
        let result = sample(8, 8, 8);
        let preview = order_preview(Some(&result), 5).unwrap();
        assert_eq!(preview.entries.len(), 5);
        assert!(preview.has_more);
        assert_eq!(preview.entries[0], result.per_order[0]);
        assert_eq!(preview.entries[4], result.per_order[4]);
    }

    #[test]
    fn order_preview_within_limit_has_no_more() {
        let result = sample(3, 2, 3);
        let preview = order_preview(Some(&result), 5).unwrap();
        assert_eq!(preview.entries.len(), 3);
        assert!(!preview.has_more);
    }
}
