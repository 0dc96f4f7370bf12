use crate::api::FleetApi;
use crate::components::icons::{Pencil, Plus, RefreshCw, Trash2};
use crate::session::use_session;
use crate::sync::ResourceStore;
use crate::web::dialog;
use fleetboard_shared::Driver;
use fleetboard_shared::protocol::{DriverDraft, DriverPatch};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 司机表单状态
///
/// 使用 `RwSignal` 字段整合零散 signal：负责数据持有、重置、
/// 以及到请求对象的转换。
#[derive(Clone, Copy)]
struct DriverForm {
    name: RwSignal<String>,
    email: RwSignal<String>,
    shift_hours: RwSignal<String>,
    is_active: RwSignal<bool>,
    /// 过去 7 日工时，逗号分隔
    week_hours: RwSignal<String>,
}

impl DriverForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            shift_hours: RwSignal::new("0".to_string()),
            is_active: RwSignal::new(true),
            week_hours: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.shift_hours.set("0".to_string());
        self.is_active.set(true);
        self.week_hours.set(String::new());
    }

    /// 把待编辑的司机灌进表单
    fn load(&self, driver: &Driver) {
        self.name.set(driver.name.clone());
        self.email.set(driver.email.clone().unwrap_or_default());
        self.shift_hours.set(driver.current_shift_hours.to_string());
        self.is_active.set(driver.is_active);
        self.week_hours.set(
            driver
                .past_7_day_hours
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    fn to_patch(&self) -> Result<DriverPatch, String> {
        let name = self.name.get_untracked().trim().to_string();
        if name.is_empty() {
            return Err("姓名不能为空".to_string());
        }

        let email_raw = self.email.get_untracked();
        let email = match email_raw.trim() {
            "" => None,
            value => Some(value.to_string()),
        };

        let current_shift_hours: f64 = self
            .shift_hours
            .get_untracked()
            .trim()
            .parse()
            .map_err(|_| "当前班次工时必须是数字".to_string())?;
        if current_shift_hours < 0.0 {
            return Err("当前班次工时不能为负".to_string());
        }

        Ok(DriverPatch {
            name,
            email,
            current_shift_hours,
            is_active: self.is_active.get_untracked(),
            past_7_day_hours: parse_week_hours(&self.week_hours.get_untracked())?,
        })
    }

    fn to_draft(&self) -> Result<DriverDraft, String> {
        let patch = self.to_patch()?;
        Ok(DriverDraft {
            name: patch.name,
            email: patch.email,
            current_shift_hours: patch.current_shift_hours,
            is_active: patch.is_active,
            past_7_day_hours: patch.past_7_day_hours,
        })
    }
}

/// 解析逗号分隔的过去 7 日工时；空输入得到空列表
fn parse_week_hours(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let hours: f64 = piece
                .parse()
                .map_err(|_| format!("过去 7 日工时里 \"{piece}\" 不是数字"))?;
            if hours < 0.0 {
                return Err("工时不能为负".to_string());
            }
            Ok(hours)
        })
        .collect()
}

#[component]
pub fn DriversPage() -> impl IntoView {
    let session = use_session();
    let store = ResourceStore::<Driver>::new(FleetApi::new(session));
    spawn_local(store.load());

    let form = DriverForm::new();
    let (dialog_open, set_dialog_open) = signal(false);
    let (editing, set_editing) = signal(Option::<Driver>::None);
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
                    // 失败时对话框保持打开，内容留给操作员修正
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

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"司机管理"</h1>
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
                        <Plus attr:class="h-4 w-4" /> "新增司机"
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
                                    <th>"姓名"</th>
                                    <th class="hidden md:table-cell">"邮箱"</th>
                                    <th>"当前班次工时"</th>
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
                                            "还没有司机。添加一个以开始。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || store.items.get()
                                    key=|driver| driver.id.clone()
                                    children=move |driver| {
                                        let edit_target = driver.clone();
                                        let delete_id = driver.id.clone();
                                        let delete_name = driver.name.clone();
                                        view! {
                                            <tr>
                                                <td class="font-bold">{driver.name.clone()}</td>
                                                <td class="hidden md:table-cell opacity-70">
                                                    {driver.email.clone().unwrap_or_else(|| "-".to_string())}
                                                </td>
                                                <td>{driver.current_shift_hours}</td>
                                                <td>
                                                    {if driver.is_active {
                                                        view! { <span class="badge badge-success">"在岗"</span> }
                                                    } else {
                                                        view! { <span class="badge badge-ghost">"停用"</span> }
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
                                                            // 未确认时不得发出删除请求
                                                            if !dialog::confirm(
                                                                &format!("确定要删除司机 {delete_name} 吗？"),
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

            // 新增/编辑对话框
            <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_dialog_open.set(false)>
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || {
                            if editing.get().is_some() { "编辑司机" } else { "新增司机" }
                        }}
                    </h3>

                    <form on:submit=on_submit class="space-y-4 mt-4">
                        <Show when=move || dialog_error().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || dialog_error().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="driver_name">
                                <span class="label-text">"姓名"</span>
                            </label>
                            <input
                                id="driver_name"
                                required
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                prop:value=form.name
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="driver_email">
                                <span class="label-text">"邮箱 (可选)"</span>
                            </label>
                            <input
                                id="driver_email"
                                type="email"
                                on:input=move |ev| form.email.set(event_target_value(&ev))
                                prop:value=form.email
                                class="input input-bordered w-full"
                            />
                        </div>

                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label" for="driver_shift_hours">
                                    <span class="label-text">"当前班次工时"</span>
                                </label>
                                <input
                                    id="driver_shift_hours"
                                    type="number"
                                    step="0.5"
                                    min="0"
                                    on:input=move |ev| form.shift_hours.set(event_target_value(&ev))
                                    prop:value=form.shift_hours
                                    class="input input-bordered w-full"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label cursor-pointer justify-start gap-3 mt-9">
                                    <input
                                        type="checkbox"
                                        class="toggle toggle-success"
                                        prop:checked=form.is_active
                                        on:change=move |ev| form.is_active.set(event_target_checked(&ev))
                                    />
                                    <span class="label-text">"在岗"</span>
                                </label>
                            </div>
                        </div>

                        <div class="form-control">
                            <label class="label" for="driver_week_hours">
                                <span class="label-text">"过去 7 日工时 (逗号分隔)"</span>
                            </label>
                            <input
                                id="driver_week_hours"
                                placeholder="7,8,6,7,8,6"
                                on:input=move |ev| form.week_hours.set(event_target_value(&ev))
                                prop:value=form.week_hours
                                class="input input-bordered w-full"
                            />
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
                                } else if editing.get().is_some() {
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
    fn week_hours_parse_and_tolerate_spacing() {
        assert_eq!(
            parse_week_hours("7, 8,6 ,7").unwrap(),
            vec![7.0, 8.0, 6.0, 7.0]
        );
        assert_eq!(parse_week_hours("").unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn week_hours_reject_garbage_and_negatives() {
        assert!(parse_week_hours("7,eight").is_err());
        assert!(parse_week_hours("7,-1").is_err());
    }
}
