use crate::api::FleetApi;
use crate::components::icons::{MapPin, Package, Play, RefreshCw, Users};
use crate::components::report::{OrderOutcomeTable, ResultOverview};
use crate::session::use_session;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use fleetboard_shared::projection::order_preview;
use fleetboard_shared::{Driver, Order, Route, SimulationResult};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 仪表盘上订单明细最多展示的条数，超出部分引导去完整明细页
const ORDER_PREVIEW_LIMIT: usize = 5;

#[component]
fn SummaryCard(
    count: Signal<usize>,
    label: &'static str,
    action: &'static str,
    route: AppRoute,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body items-center text-center">
                <div class="text-primary">{children()}</div>
                <h2 class="card-title">{label}</h2>
                <div class="text-4xl font-bold">{move || count.get()}</div>
                <button
                    class="btn btn-ghost btn-sm text-primary"
                    on:click=move |_| router.navigate_route(route.clone())
                >
                    {action}
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (latest, set_latest) = signal(Option::<SimulationResult>::None);
    let (driver_count, set_driver_count) = signal(0usize);
    let (route_count, set_route_count) = signal(0usize);
    let (order_count, set_order_count) = signal(0usize);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            let api = FleetApi::new(session);
            let (latest_res, drivers_res, routes_res, orders_res) = futures::join!(
                api.latest_simulation(),
                api.list::<Driver>(),
                api.list::<Route>(),
                api.list::<Order>(),
            );

            // 失败的部分保留旧数据，只挂一条提示
            let mut failed = false;
            match latest_res {
                Ok(result) => {
                    let _ = set_latest.try_set(result);
                }
                Err(_) => failed = true,
            }
            match drivers_res {
                Ok(list) => {
                    let _ = set_driver_count.try_set(list.len());
                }
                Err(_) => failed = true,
            }
            match routes_res {
                Ok(list) => {
                    let _ = set_route_count.try_set(list.len());
                }
                Err(_) => failed = true,
            }
            match orders_res {
                Ok(list) => {
                    let _ = set_order_count.try_set(list.len());
                }
                Err(_) => failed = true,
            }

            let _ = set_error_msg.try_set(if failed {
                Some("仪表盘数据加载失败".to_string())
            } else {
                None
            });
            let _ = set_loading.try_set(false);
        });
    };

    // 初始加载
    load();

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"物流仪表盘"</h1>
                <button
                    on:click=move |_| load()
                    disabled=move || loading.get()
                    class="btn btn-ghost btn-circle"
                >
                    <RefreshCw attr:class=move || {
                        if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                    } />
                </button>
            </div>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="grid md:grid-cols-3 gap-6">
                <SummaryCard
                    count=Signal::derive(move || driver_count.get())
                    label="司机"
                    action="管理司机"
                    route=AppRoute::Drivers
                >
                    <Users attr:class="h-8 w-8" />
                </SummaryCard>
                <SummaryCard
                    count=Signal::derive(move || route_count.get())
                    label="路线"
                    action="管理路线"
                    route=AppRoute::Routes
                >
                    <MapPin attr:class="h-8 w-8" />
                </SummaryCard>
                <SummaryCard
                    count=Signal::derive(move || order_count.get())
                    label="订单"
                    action="管理订单"
                    route=AppRoute::Orders
                >
                    <Package attr:class="h-8 w-8" />
                </SummaryCard>
            </div>

            {move || {
                if loading.get() && latest.get().is_none() {
                    return view! {
                        <div class="text-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                    .into_any();
                }
                match latest.get() {
                    Some(result) => {
                        let preview = order_preview(Some(&result), ORDER_PREVIEW_LIMIT);
                        let has_more = preview.as_ref().is_some_and(|p| p.has_more);
                        let entries = preview.map(|p| p.entries).unwrap_or_default();
                        let result_id = result.id.clone();
                        view! {
                            <div class="space-y-6">
                                <h2 class="text-xl font-bold">"最近一次模拟结果"</h2>
                                <ResultOverview result=result />
                                <div class="card bg-base-100 shadow-xl">
                                    <div class="card-body">
                                        <div class="flex items-center justify-between">
                                            <h3 class="card-title text-base">"订单明细"</h3>
                                            <Show when=move || has_more>
                                                {
                                                    let result_id = result_id.clone();
                                                    view! {
                                                        <button
                                                            class="btn btn-link btn-sm"
                                                            on:click=move |_| {
                                                                router
                                                                    .navigate_route(
                                                                        AppRoute::SimulationDetails(result_id.clone()),
                                                                    )
                                                            }
                                                        >
                                                            "查看完整明细"
                                                        </button>
                                                    }
                                                }
                                            </Show>
                                        </div>
                                        <OrderOutcomeTable entries=entries />
                                    </div>
                                </div>
                                <button
                                    class="btn btn-primary gap-2"
                                    on:click=move |_| router.navigate_route(AppRoute::Simulation)
                                >
                                    <Play attr:class="h-4 w-4" /> "运行新模拟"
                                </button>
                            </div>
                        }
                        .into_any()
                    }
                    None => view! {
                        // 还没有任何模拟：引导而不是错误横幅
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body items-center text-center py-12">
                                <p class="text-base-content/70">"还没有运行过任何模拟。"</p>
                                <button
                                    class="btn btn-primary gap-2 mt-4"
                                    on:click=move |_| router.navigate_route(AppRoute::Simulation)
                                >
                                    <Play attr:class="h-4 w-4" /> "运行第一次模拟"
                                </button>
                            </div>
                        </div>
                    }
                    .into_any(),
                }
            }}
        </div>
    }
}
