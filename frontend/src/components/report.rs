//! 模拟结果的报表组件
//!
//! 只做投影数据的呈现；数值派生全部来自 `fleetboard_shared::projection`，
//! 图形用 daisyUI 原生元素画，不引入图表库。

use crate::web::date::format_timestamp;
use fleetboard_shared::projection::{DeliverySplit, delivery_chart, fuel_cost_chart};
use fleetboard_shared::{OrderOutcome, SimulationResult, TrafficLevel};
use leptos::prelude::*;

/// 准时/迟到配送分布
#[component]
pub fn DeliverySplitChart(split: DeliverySplit) -> impl IntoView {
    let total = split.total();
    let percent = if total == 0 {
        0
    } else {
        split.on_time * 100 / total
    };

    view! {
        <div class="flex items-center gap-6">
            <div
                class="radial-progress text-success"
                style=format!("--value:{percent}; --size:8rem;")
                role="progressbar"
            >
                {format!("{percent}%")}
            </div>
            <div class="space-y-1 text-sm">
                <div class="flex items-center gap-2">
                    <span class="badge badge-success badge-xs"></span>
                    "准时 " {split.on_time}
                </div>
                <div class="flex items-center gap-2">
                    <span class="badge badge-error badge-xs"></span>
                    "迟到 " {split.late}
                </div>
            </div>
        </div>
    }
}

/// 燃油成本按交通等级的分布，顺序与服务端一致
#[component]
pub fn FuelCostChart(series: Vec<(TrafficLevel, f64)>) -> impl IntoView {
    let max = series.iter().map(|(_, cost)| *cost).fold(0.0f64, f64::max);

    view! {
        <div class="space-y-3 w-full">
            {series
                .into_iter()
                .map(|(level, cost)| {
                    let ratio = if max > 0.0 { cost / max * 100.0 } else { 0.0 };
                    let bar_class = match level {
                        TrafficLevel::Low => "progress progress-success w-full",
                        TrafficLevel::Medium => "progress progress-warning w-full",
                        TrafficLevel::High => "progress progress-error w-full",
                    };
                    view! {
                        <div>
                            <div class="flex justify-between text-sm mb-1">
                                <span>{level.as_str()}</span>
                                <span class="font-mono">{format!("₹{cost:.2}")}</span>
                            </div>
                            <progress class=bar_class value=format!("{ratio:.0}") max="100"></progress>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// KPI 卡片 + 两张图的整体概览
#[component]
pub fn ResultOverview(result: SimulationResult) -> impl IntoView {
    let kpis = result.kpis.clone();
    let split = delivery_chart(Some(&result));
    let fuel = fuel_cost_chart(Some(&result));

    view! {
        <div class="space-y-6">
            <div class="text-sm text-base-content/60">
                "运行于 " {format_timestamp(&result.created_at)}
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"总利润"</div>
                    <div class="stat-value text-primary">
                        {format!("₹{:.2}", kpis.total_profit)}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"效率"</div>
                    <div class="stat-value text-secondary">
                        {format!("{:.2}%", kpis.efficiency)}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"配送 (准时/总数)"</div>
                    <div class="stat-value">
                        {format!("{} / {}", kpis.on_time_deliveries, kpis.total_deliveries)}
                    </div>
                </div>
            </div>

            <div class="grid md:grid-cols-2 gap-6">
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">"配送表现"</h3>
                        {split.map(|split| view! { <DeliverySplitChart split=split /> })}
                    </div>
                </div>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">"燃油成本 (按交通等级)"</h3>
                        {fuel.map(|series| view! { <FuelCostChart series=series /> })}
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 订单结局明细表（完整或截断后的条目都用它渲染）
#[component]
pub fn OrderOutcomeTable(entries: Vec<OrderOutcome>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"订单编号"</th>
                        <th>"金额 (₹)"</th>
                        <th>"司机"</th>
                        <th>"状态"</th>
                        <th>"利润 (₹)"</th>
                    </tr>
                </thead>
                <tbody>
                    {entries
                        .into_iter()
                        .map(|outcome| {
                            view! {
                                <tr>
                                    <td class="font-mono">{outcome.order_id}</td>
                                    <td>{outcome.value_rs}</td>
                                    <td>{outcome.assigned_driver}</td>
                                    <td>
                                        {if outcome.on_time {
                                            view! { <span class="badge badge-success">"准时"</span> }
                                        } else {
                                            view! { <span class="badge badge-error">"迟到"</span> }
                                        }}
                                    </td>
                                    <td class="font-mono">{format!("{:.2}", outcome.profit)}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}
