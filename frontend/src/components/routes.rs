use crate::api::FleetApi;
use crate::components::icons::{Pencil, Plus, RefreshCw, Trash2};
use crate::session::use_session;
use crate::sync::ResourceStore;
use crate::web::dialog;
use fleetboard_shared::protocol::{RouteDraft, RoutePatch};
use fleetboard_shared::{Route, TrafficLevel};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 路线表单状态
#[derive(Clone, Copy)]
struct RouteForm {
    route_id: RwSignal<String>,
    distance_km: RwSignal<String>,
    traffic_level: RwSignal<TrafficLevel>,
    base_time_minutes: RwSignal<String>,
}

impl RouteForm {
    fn new() -> Self {
        Self {
            route_id: RwSignal::new(String::new()),
            distance_km: RwSignal::new(String::new()),
            traffic_level: RwSignal::new(TrafficLevel::Low),
            base_time_minutes: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.route_id.set(String::new());
        self.distance_km.set(String::new());
        self.traffic_level.set(TrafficLevel::Low);
        self.base_time_minutes.set(String::new());
    }

    fn load(&self, route: &Route) {
        self.route_id.set(route.route_id.clone());
        self.distance_km.set(route.distance_km.to_string());
        self.traffic_level.set(route.traffic_level);
        self.base_time_minutes.set(route.base_time_minutes.to_string());
    }

    /// 补丁里没有路线编号：它创建后不可变
    fn to_patch(&self) -> Result<RoutePatch, String> {
        let distance_km: f64 = self
            .distance_km
            .get_untracked()
            .trim()
            .parse()
            .map_err(|_| "里程必须是数字".to_string())?;
        if distance_km <= 0.0 {
            return Err("里程必须大于 0".to_string());
        }

        let base_time_minutes: u32 = self
            .base_time_minutes
            .get_untracked()
            .trim()
            .parse()
            .map_err(|_| "基准时间必须是整数分钟".to_string())?;
        if base_time_minutes < 1 {
            return Err("基准时间至少 1 分钟".to_string());
        }

        Ok(RoutePatch {
            distance_km,
            traffic_level: self.traffic_level.get_untracked(),
            base_time_minutes,
        })
    }

    fn to_draft(&self) -> Result<RouteDraft, String> {
        let route_id = self.route_id.get_untracked().trim().to_string();
        if route_id.is_empty() {
            return Err("路线编号不能为空".to_string());
        }
        let patch = self.to_patch()?;
        Ok(RouteDraft {
            route_id,
            distance_km: patch.distance_km,
            traffic_level: patch.traffic_level,
            base_time_minutes: patch.base_time_minutes,
        })
    }
}

fn traffic_badge(level: TrafficLevel) -> &'static str {
    match level {
        TrafficLevel::Low => "badge badge-success badge-outline",
        TrafficLevel::Medium => "badge badge-warning badge-outline",
        TrafficLevel::High => "badge badge-error badge-outline",
    }
}

#[component]
pub fn RoutesPage() -> impl IntoView {
    let session = use_session();
    let store = ResourceStore::<Route>::new(FleetApi::new(session));
    spawn_local(store.load());

    let form = RouteForm::new();
    let (dialog_open, set_dialog_open) = signal(false);
    let (editing, set_editing) = signal(Option::<Route>::None);
    let (form_error, set_form_error) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(node) = dialog_ref.get() {
            if dialog_open.get() {
                if !node.open() {
                    let _ = node.show_modal();
                }
            } else if node.open() {
                node.close();
            }
        }
    });

    let open_create = move |_| {
        set_editing.set(None);
        form.reset();
        set_form_error.set(None);
        set_dialog_open.set(true);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match editing.get_untracked() {
            Some(current) => {
                let patch = match form.to_patch() {
                    Ok(patch) => patch,
                    Err(message) => {
                        set_form_error.set(Some(message));
                        return;
                    }
                };
                set_form_error.set(None);
                let id = current.id.clone();
                spawn_local(async move {
                    if store.update(id, patch).await {
                        let _ = set_editing.try_set(None);
                        let _ = set_dialog_open.try_set(false);
                        form.reset();
                    }
                });
            }
            None => {
                let draft = match form.to_draft() {
                    Ok(draft) => draft,
                    Err(message) => {
                        set_form_error.set(Some(message));
                        return;
                    }
                };
                set_form_error.set(None);
                spawn_local(async move {
                    if store.create(draft).await {
                        let _ = set_dialog_open.try_set(false);
                        form.reset();
                    }
                });
            }
        }
    };

    let dialog_error = move || form_error.get().or_else(|| store.error.get());
    let is_editing = move || editing.get().is_some();

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"路线管理"</h1>
                <div class="flex gap-2">
                    <button
                        on:click=move |_| spawn_local(store.load())
                        disabled=move || store.loading.get()
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || {
                            if store.loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                        } />
                    </button>
                    <button class="btn btn-primary gap-2" on:click=open_create>
                        <Plus attr:class="h-4 w-4" /> "新增路线"
                    </button>
                </div>
            </div>

            <Show when=move || store.error.get().is_some() && !dialog_open.get()>
                <div role="alert" class="alert alert-error">
                    <span>{move || store.error.get().unwrap_or_default()}</span>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"路线编号"</th>
                                    <th>"里程 (km)"</th>
                                    <th>"交通等级"</th>
                                    <th>"基准时间 (分钟)"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || {
                                    store.items.with(Vec::is_empty) && store.loading.get()
                                }>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span>
                                            " 加载中..."
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || {
                                    store.items.with(Vec::is_empty) && !store.loading.get()
                                }>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "还没有路线。添加一个以开始。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || store.items.get()
                                    key=|route| route.id.clone()
                                    children=move |route| {
                                        let edit_target = route.clone();
                                        let delete_id = route.id.clone();
                                        let delete_key = route.route_id.clone();
                                        view! {
                                            <tr>
                                                <td class="font-mono font-bold">{route.route_id.clone()}</td>
                                                <td>{route.distance_km}</td>
                                                <td>
                                                    <span class=traffic_badge(route.traffic_level)>
                                                        {route.traffic_level.as_str()}
                                                    </span>
                                                </td>
                                                <td>{route.base_time_minutes}</td>
                                                <td class="flex gap-1 justify-end">
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square"
                                                        on:click=move |_| {
                                                            form.load(&edit_target);
                                                            set_editing.set(Some(edit_target.clone()));
                                                            set_form_error.set(None);
                                                            set_dialog_open.set(true);
                                                        }
                                                    >
                                                        <Pencil attr:class="h-4 w-4" />
                                                    </button>
                                                    <button
                                                        class="btn btn-ghost btn-sm btn-square text-error"
                                                        disabled=move || store.busy.get()
                                                        on:click=move |_| {
                                                            if !dialog::confirm(
                                                                &format!("确定要删除路线 {delete_key} 吗？"),
                                                            ) {
                                                                return;
                                                            }
                                                            let id = delete_id.clone();
                                                            spawn_local(async move {
                                                                store.remove(id).await;
                                                            });
                                                        }
                                                    >
                                                        <Trash2 attr:class="h-4 w-4" />
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>

            <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_dialog_open.set(false)>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || if is_editing() { "编辑路线" } else { "新增路线" }}
                    </h3>

                    <form on:submit=on_submit class="space-y-4 mt-4">
                        <Show when=move || dialog_error().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || dialog_error().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="route_key">
                                <span class="label-text">"路线编号"</span>
                                <Show when=is_editing>
                                    <span class="label-text-alt text-base-content/50">
                                        "创建后不可修改"
                                    </span>
                                </Show>
                            </label>
                            <input
                                id="route_key"
                                required
                                placeholder="R1"
                                disabled=is_editing
                                on:input=move |ev| form.route_id.set(event_target_value(&ev))
                                prop:value=form.route_id
                                class="input input-bordered w-full font-mono"
                            />
                        </div>

                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label" for="route_distance">
                                    <span class="label-text">"里程 (km)"</span>
                                </label>
                                <input
                                    id="route_distance"
                                    type="number"
                                    step="0.1"
                                    min="0"
                                    required
                                    on:input=move |ev| form.distance_km.set(event_target_value(&ev))
                                    prop:value=form.distance_km
                                    class="input input-bordered w-full"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="route_base_time">
                                    <span class="label-text">"基准时间 (分钟)"</span>
                                </label>
                                <input
                                    id="route_base_time"
                                    type="number"
                                    min="1"
                                    required
                                    on:input=move |ev| {
                                        form.base_time_minutes.set(event_target_value(&ev))
                                    }
                                    prop:value=form.base_time_minutes
                                    class="input input-bordered w-full"
                                />
                            </div>
                        </div>

                        <div class="form-control">
                            <label class="label" for="route_traffic">
                                <span class="label-text">"交通等级"</span>
                            </label>
                            <select
                                id="route_traffic"
                                class="select select-bordered w-full"
                                prop:value=move || form.traffic_level.get().as_str().to_string()
                                on:change=move |ev| {
                                    form.traffic_level
                                        .set(
                                            TrafficLevel::from_key(&event_target_value(&ev))
                                                .unwrap_or_default(),
                                        )
                                }
                            >
                                {TrafficLevel::ALL
                                    .iter()
                                    .map(|level| {
                                        view! { <option value=level.as_str()>{level.as_str()}</option> }
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| set_dialog_open.set(false)
                            >
                                "取消"
                            </button>
                            <button class="btn btn-primary" disabled=move || store.busy.get()>
                                {move || if store.busy.get() {
                                    view! { <span class="loading loading-spinner"></span> "保存中..." }.into_any()
                                } else if is_editing() {
                                    "更新".into_any()
                                } else {
                                    "保存".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </dialog>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_levels_render_distinct_badges() {
        let classes: Vec<_> = TrafficLevel::ALL.iter().map(|l| traffic_badge(*l)).collect();
        assert_eq!(classes.len(), 3);
        assert!(classes.windows(2).all(|pair| pair[0] != pair[1]));
    }
}
