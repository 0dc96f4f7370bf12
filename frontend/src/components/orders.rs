use crate::api::FleetApi;
use crate::components::icons::{Pencil, Plus, RefreshCw, Trash2};
use crate::session::use_session;
use crate::sync::ResourceStore;
use crate::web::dialog;
use fleetboard_shared::protocol::{OrderDraft, OrderPatch};
use fleetboard_shared::{Order, OrderStatus, Route};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 订单表单状态
#[derive(Clone, Copy)]
struct OrderForm {
    order_id: RwSignal<String>,
    value_rs: RwSignal<String>,
    assigned_route_id: RwSignal<String>,
    status: RwSignal<OrderStatus>,
}

impl OrderForm {
    fn new() -> Self {
        Self {
            order_id: RwSignal::new(String::new()),
            value_rs: RwSignal::new(String::new()),
            assigned_route_id: RwSignal::new(String::new()),
            status: RwSignal::new(OrderStatus::Pending),
        }
    }

    fn reset(&self) {
        self.order_id.set(String::new());
        self.value_rs.set(String::new());
        self.assigned_route_id.set(String::new());
        self.status.set(OrderStatus::Pending);
    }

    fn load(&self, order: &Order) {
        self.order_id.set(order.order_id.clone());
        self.value_rs.set(order.value_rs.to_string());
        self.assigned_route_id.set(order.assigned_route_id.clone());
        self.status.set(order.status);
    }

    /// 补丁里没有订单编号：它创建后不可变
    fn to_patch(&self) -> Result<OrderPatch, String> {
        let value_rs: f64 = self
            .value_rs
            .get_untracked()
            .trim()
            .parse()
            .map_err(|_| "金额必须是数字".to_string())?;
        if value_rs <= 0.0 {
            return Err("金额必须大于 0".to_string());
        }

        let assigned_route_id = self.assigned_route_id.get_untracked();
        if assigned_route_id.is_empty() {
            return Err("必须选择一条路线".to_string());
        }

        Ok(OrderPatch {
            value_rs,
            assigned_route_id,
            status: self.status.get_untracked(),
        })
    }

    fn to_draft(&self) -> Result<OrderDraft, String> {
        let order_id = self.order_id.get_untracked().trim().to_string();
        if order_id.is_empty() {
            return Err("订单编号不能为空".to_string());
        }
        let patch = self.to_patch()?;
        Ok(OrderDraft {
            order_id,
            value_rs: patch.value_rs,
            assigned_route_id: patch.assigned_route_id,
            status: patch.status,
        })
    }
}

fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "待配送",
        OrderStatus::Delivered => "已送达",
    }
}

#[component]
pub fn OrdersPage() -> impl IntoView {
    let session = use_session();
    let store = ResourceStore::<Order>::new(FleetApi::new(session));
    spawn_local(store.load());

    // 路线列表只用来填充下拉框；引用有效性由服务端裁决
    let (routes, set_routes) = signal(Vec::<Route>::new());
    spawn_local(async move {
        let api = FleetApi::new(session);
        if let Ok(list) = api.list::<Route>().await {
            let _ = set_routes.try_set(list);
        }
    });

    let form = OrderForm::new();
    let (dialog_open, set_dialog_open) = signal(false);
    let (editing, set_editing) = signal(Option::<Order>::None);
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
                <h1 class="text-2xl font-bold">"订单管理"</h1>
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
                        <Plus attr:class="h-4 w-4" /> "新增订单"
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
                                    <th>"订单编号"</th>
                                    <th>"金额 (₹)"</th>
                                    <th>"指派路线"</th>
                                    <th>"状态"</th>
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
                                            "还没有订单。添加一个以开始。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || store.items.get()
                                    key=|order| order.id.clone()
                                    children=move |order| {
                                        let edit_target = order.clone();
                                        let delete_id = order.id.clone();
                                        let delete_key = order.order_id.clone();
                                        view! {
                                            <tr>
                                                <td class="font-mono font-bold">{order.order_id.clone()}</td>
                                                <td>{order.value_rs}</td>
                                                <td class="font-mono">{order.assigned_route_id.clone()}</td>
                                                <td>
                                                    {if order.status == OrderStatus::Delivered {
                                                        view! {
                                                            <span class="badge badge-success">
                                                                {status_label(order.status)}
                                                            </span>
                                                        }
                                                    } else {
                                                        view! {
                                                            <span class="badge badge-warning">
                                                                {status_label(order.status)}
                                                            </span>
                                                        }
                                                    }}
                                                </td>
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
                                                                &format!("确定要删除订单 {delete_key} 吗？"),
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
                        {move || if is_editing() { "编辑订单" } else { "新增订单" }}
                    </h3>

                    <form on:submit=on_submit class="space-y-4 mt-4">
                        <Show when=move || dialog_error().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || dialog_error().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="order_key">
                                <span class="label-text">"订单编号"</span>
                                <Show when=is_editing>
                                    <span class="label-text-alt text-base-content/50">
                                        "创建后不可修改"
                                    </span>
                                </Show>
                            </label>
                            <input
                                id="order_key"
                                required
                                placeholder="O1"
                                disabled=is_editing
                                on:input=move |ev| form.order_id.set(event_target_value(&ev))
                                prop:value=form.order_id
                                class="input input-bordered w-full font-mono"
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="order_value">
                                <span class="label-text">"金额 (₹)"</span>
                            </label>
                            <input
                                id="order_value"
                                type="number"
                                step="0.01"
                                min="0"
                                required
                                on:input=move |ev| form.value_rs.set(event_target_value(&ev))
                                prop:value=form.value_rs
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="order_route">
                                <span class="label-text">"指派路线"</span>
                            </label>
                            <select
                                id="order_route"
                                class="select select-bordered w-full"
                                prop:value=move || form.assigned_route_id.get()
                                on:change=move |ev| {
                                    form.assigned_route_id.set(event_target_value(&ev))
                                }
                            >
                                <option value="">"选择路线"</option>
                                {move || {
                                    routes
                                        .get()
                                        .into_iter()
                                        .map(|route| {
                                            let label = format!(
                                                "{} ({} km, {})",
                                                route.route_id,
                                                route.distance_km,
                                                route.traffic_level,
                                            );
                                            view! {
                                                <option value=route.route_id.clone()>{label}</option>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </select>
                        </div>

                        <div class="form-control">
                            <label class="label" for="order_status">
                                <span class="label-text">"状态"</span>
                            </label>
                            <select
                                id="order_status"
                                class="select select-bordered w-full"
                                prop:value=move || form.status.get().as_str().to_string()
                                on:change=move |ev| {
                                    form.status
                                        .set(
                                            OrderStatus::from_key(&event_target_value(&ev))
                                                .unwrap_or_default(),
                                        )
                                }
                            >
                                {OrderStatus::ALL
                                    .iter()
                                    .map(|status| {
                                        view! {
                                            <option value=status.as_str()>
                                                {status_label(*status)}
                                            </option>
                                        }
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
