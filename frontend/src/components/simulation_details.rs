use crate::api::{ApiError, FleetApi};
use crate::components::report::OrderOutcomeTable;
use crate::session::use_session;
use crate::web::date::format_timestamp;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use fleetboard_shared::SimulationResult;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SimulationDetailsPage(id: String) -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (simulation, set_simulation) = signal(Option::<SimulationResult>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        let api = FleetApi::new(session);
        match api.simulation_by_id(&id).await {
            Ok(result) => {
                let _ = set_simulation.try_set(Some(result));
            }
            // 查无此模拟按空数据处理，不挂错误横幅
            Err(ApiError::NotFound) => {}
            Err(err) => {
                let _ = set_error_msg.try_set(Some(err.message()));
            }
        }
        let _ = set_loading.try_set(false);
    });

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <h1 class="text-2xl font-bold">"模拟明细"</h1>

            <Show when=move || error_msg.get().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                </div>
            </Show>

            {move || {
                if loading.get() {
                    return view! {
                        <div class="text-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                    .into_any();
                }
                match simulation.get() {
                    Some(result) => view! {
                        <div class="space-y-4">
                            <div class="text-sm text-base-content/60">
                                "运行于 " {format_timestamp(&result.created_at)}
                            </div>
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <OrderOutcomeTable entries=result.per_order.clone() />
                                </div>
                            </div>
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body items-center text-center py-12 text-base-content/70">
                                "没有找到该模拟记录。"
                            </div>
                        </div>
                    }
                    .into_any(),
                }
            }}

            <button
                class="btn btn-ghost"
                on:click=move |_| router.navigate_route(AppRoute::Dashboard)
            >
                "← 返回仪表盘"
            </button>
        </div>
    }
}
