use crate::api::FleetApi;
use crate::components::icons::Play;
use crate::components::report::{OrderOutcomeTable, ResultOverview};
use crate::session::use_session;
use fleetboard_shared::SimulationResult;
use fleetboard_shared::protocol::SimulationRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 模拟参数表单
///
/// 使用 `RwSignal` 字段以便整体按值在闭包间传递。
#[derive(Clone, Copy)]
struct SimulationForm {
    number_of_drivers: RwSignal<String>,
    route_start_time: RwSignal<String>,
    max_hours_per_driver: RwSignal<String>,
}

impl SimulationForm {
    fn new() -> Self {
        Self {
            number_of_drivers: RwSignal::new("5".to_string()),
            route_start_time: RwSignal::new("09:00".to_string()),
            max_hours_per_driver: RwSignal::new("8".to_string()),
        }
    }

    fn to_request(&self) -> Result<SimulationRequest, String> {
        build_request(
            &self.number_of_drivers.get_untracked(),
            &self.route_start_time.get_untracked(),
            &self.max_hours_per_driver.get_untracked(),
        )
    }
}

/// 把原始输入转换为模拟请求；客户端只做格式校验，业务校验在服务端
fn build_request(
    drivers_raw: &str,
    start_time_raw: &str,
    max_hours_raw: &str,
) -> Result<SimulationRequest, String> {
    let number_of_drivers: u32 = drivers_raw
        .trim()
        .parse()
        .map_err(|_| "司机数量必须是整数".to_string())?;
    if number_of_drivers < 1 {
        return Err("至少需要 1 名司机".to_string());
    }

    let route_start_time = start_time_raw.trim();
    if !is_valid_start_time(route_start_time) {
        return Err("出发时间格式应为 HH:MM".to_string());
    }

    let max_hours_per_driver: f64 = max_hours_raw
        .trim()
        .parse()
        .map_err(|_| "每日最大工时必须是数字".to_string())?;
    if max_hours_per_driver < 0.5 {
        return Err("每日最大工时至少 0.5 小时".to_string());
    }

    Ok(SimulationRequest {
        number_of_drivers,
        route_start_time: route_start_time.to_string(),
        max_hours_per_driver,
    })
}

fn is_valid_start_time(raw: &str) -> bool {
    match raw.split_once(':') {
        Some((hh, mm)) if !hh.is_empty() && !mm.is_empty() => {
            matches!(
                (hh.parse::<u32>(), mm.parse::<u32>()),
                (Ok(h), Ok(m)) if h < 24 && m < 60
            )
        }
        _ => false,
    }
}

#[component]
pub fn SimulationPage() -> impl IntoView {
    let session = use_session();
    let form = SimulationForm::new();

    let (result, set_result) = signal(Option::<SimulationResult>::None);
    let (running, set_running) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match form.to_request() {
            Ok(request) => request,
            Err(message) => {
                set_error_msg.set(Some(message));
                return;
            }
        };

        set_running.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = FleetApi::new(session);
            match api.run_simulation(&request).await {
                Ok(outcome) => {
                    let _ = set_result.try_set(Some(outcome));
                }
                Err(err) => {
                    // 上一次的结果保留在页面上
                    let _ = set_error_msg.try_set(Some(err.message()));
                }
            }
            let _ = set_running.try_set(false);
        });
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">
            <h1 class="text-2xl font-bold">"路线模拟"</h1>

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body" on:submit=on_submit>
                    <h2 class="card-title text-base">"运行新模拟"</h2>

                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <div class="grid md:grid-cols-3 gap-4">
                        <div class="form-control">
                            <label class="label" for="number_of_drivers">
                                <span class="label-text">"司机数量"</span>
                            </label>
                            <input
                                id="number_of_drivers"
                                type="number"
                                min="1"
                                on:input=move |ev| form.number_of_drivers.set(event_target_value(&ev))
                                prop:value=form.number_of_drivers
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="route_start_time">
                                <span class="label-text">"出发时间 (HH:MM)"</span>
                            </label>
                            <input
                                id="route_start_time"
                                type="text"
                                placeholder="09:00"
                                on:input=move |ev| form.route_start_time.set(event_target_value(&ev))
                                prop:value=form.route_start_time
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="max_hours_per_driver">
                                <span class="label-text">"每日最大工时"</span>
                            </label>
                            <input
                                id="max_hours_per_driver"
                                type="number"
                                step="0.1"
                                min="0.5"
                                on:input=move |ev| form.max_hours_per_driver.set(event_target_value(&ev))
                                prop:value=form.max_hours_per_driver
                                class="input input-bordered"
                                required
                            />
                        </div>
                    </div>

                    <div class="card-actions mt-4">
                        <button class="btn btn-primary gap-2" disabled=move || running.get()>
                            {move || if running.get() {
                                view! { <span class="loading loading-spinner"></span> "运行中..." }.into_any()
                            } else {
                                view! { <Play attr:class="h-4 w-4" /> "运行模拟" }.into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>

            {move || {
                result
                    .get()
                    .map(|outcome| {
                        let entries = outcome.per_order.clone();
                        view! {
                            <div class="space-y-6">
                                <h2 class="text-xl font-bold">"模拟结果"</h2>
                                <ResultOverview result=outcome />
                                <div class="card bg-base-100 shadow-xl">
                                    <div class="card-body">
                                        <h3 class="card-title text-base">"订单明细"</h3>
                                        <OrderOutcomeTable entries=entries />
                                    </div>
                                </div>
                            </div>
                        }
                    })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_default_parameters() {
        let request = build_request("5", "09:00", "8").unwrap();
        assert_eq!(request.number_of_drivers, 5);
        assert_eq!(request.route_start_time, "09:00");
        assert_eq!(request.max_hours_per_driver, 8.0);
    }

    #[test]
    fn rejects_zero_drivers_and_garbage() {
        assert!(build_request("0", "09:00", "8").is_err());
        assert!(build_request("five", "09:00", "8").is_err());
        assert!(build_request("3", "09:00", "0.2").is_err());
        assert!(build_request("3", "09:00", "lots").is_err());
    }

    #[test]
    fn start_time_must_be_a_valid_clock_reading() {
        assert!(is_valid_start_time("09:00"));
        assert!(is_valid_start_time("23:59"));
        assert!(is_valid_start_time("7:05"));
        assert!(!is_valid_start_time("24:00"));
        assert!(!is_valid_start_time("12:60"));
        assert!(!is_valid_start_time("12"));
        assert!(!is_valid_start_time(":30"));
        assert!(!is_valid_start_time("mid:day"));
    }
}
