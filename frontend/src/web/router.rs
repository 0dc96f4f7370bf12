//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 通过注入的两个会话信号实现守卫：
//! - `session_resolved`: 会话未决期间不做任何跳转（Loading 态）
//! - `is_authenticated`: 决定受保护路由能否进入
//!
//! 未认证访问受保护路由时会记录被打断的目的地，
//! 登录成功后把操作员送回原本要去的页面。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 未认证跳转被打断时记录的目的地，登录成功后取出
    pending_redirect: RwSignal<Option<AppRoute>>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
    /// 会话是否已决（restore 是否完成）
    session_resolved: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, session_resolved: Signal<bool>) -> Self {
        // 初始路由从 URL 解析；守卫在会话已决后才会介入
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            pending_redirect: RwSignal::new(None),
            is_authenticated,
            session_resolved,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 会话已决信号（供出口组件渲染 Loading 占位）
    pub fn session_resolved(&self) -> Signal<bool> {
        self.session_resolved
    }

    /// 认证状态信号（供出口组件做最后一道渲染闸门）
    pub fn is_authenticated(&self) -> Signal<bool> {
        self.is_authenticated
    }

    /// **核心方法：导航与守卫**
    pub fn navigate_route(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        // 会话未决：记录路由但不做守卫跳转，等 resolve 后由 Effect 统一处理
        if !self.session_resolved.get_untracked() {
            if use_push {
                push_history_state(&target_route.to_path());
            } else {
                replace_history_state(&target_route.to_path());
            }
            self.set_route.set(target_route);
            return;
        }

        let is_auth = self.is_authenticated.get_untracked();

        // 目标需要认证但用户未认证：记下目的地，转去登录
        if target_route.requires_auth() && !is_auth {
            web_sys::console::log_1(&"[Router] Access denied. Redirecting to login.".into());
            self.pending_redirect.set(Some(target_route));
            let redirect = AppRoute::auth_failure_redirect();
            if use_push {
                push_history_state(&redirect.to_path());
            } else {
                replace_history_state(&redirect.to_path());
            }
            self.set_route.set(redirect);
            return;
        }

        // 已认证用户访问登录页：送去记录的目的地或仪表盘
        if target_route.should_redirect_when_authenticated() && is_auth {
            let redirect = self
                .pending_redirect
                .try_update(Option::take)
                .flatten()
                .unwrap_or_else(AppRoute::auth_success_redirect);
            if use_push {
                push_history_state(&redirect.to_path());
            } else {
                replace_history_state(&redirect.to_path());
            }
            self.set_route.set(redirect);
            return;
        }

        if use_push {
            push_history_state(&target_route.to_path());
        } else {
            replace_history_state(&target_route.to_path());
        }
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let service = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑，但用 replace 以免污染历史栈
            service.navigate_to_route(target_route, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话状态变化时的自动重定向
    ///
    /// 承担两类转换：
    /// - 会话 resolve 的那一次 Loading -> Authenticated/Unauthenticated 判定
    /// - 会话中途失效（强制登出）或登录成功后的跳转
    fn setup_session_redirect(&self) {
        let service = *self;

        Effect::new(move |_| {
            // 未决期间什么都不做，保证判定只在 resolve 后发生
            if !service.session_resolved.get() {
                return;
            }
            let is_auth = service.is_authenticated.get();
            let route = service.current_route.get_untracked();

            if is_auth {
                if route.should_redirect_when_authenticated() {
                    let redirect = service
                        .pending_redirect
                        .try_update(Option::take)
                        .flatten()
                        .unwrap_or_else(AppRoute::auth_success_redirect);
                    web_sys::console::log_1(
                        &format!("[Router] Authenticated, redirecting to {redirect}.").into(),
                    );
                    push_history_state(&redirect.to_path());
                    service.set_route.set(redirect);
                }
            } else if route.requires_auth() {
                // 记录被打断的目的地，登录成功后回到这里
                web_sys::console::log_1(
                    &"[Router] Session gone, redirecting to login.".into(),
                );
                service.pending_redirect.set(Some(route));
                let redirect = AppRoute::auth_failure_redirect();
                push_history_state(&redirect.to_path());
                service.set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>, session_resolved: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated, session_resolved);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 会话已决信号
    session_resolved: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, session_resolved);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
/// 受保护内容只在会话已决且已认证时渲染；其余时间渲染中性占位，
/// 由重定向 Effect 负责把路由带到正确的位置。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        if current.requires_auth()
            && !(router.session_resolved().get() && router.is_authenticated().get())
        {
            return view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any();
        }
        matcher(current)
    }
}
