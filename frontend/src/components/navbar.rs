//! 顶部导航栏
//!
//! 仅在已认证时渲染；当前页对应的入口高亮。

use crate::components::icons::{LogOut, Truck};
use crate::session::{logout, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
fn NavItem(route: AppRoute, label: &'static str) -> impl IntoView {
    let router = use_router();
    let current = router.current_route();
    let active_route = route.clone();

    view! {
        <button
            class=move || {
                if current.get() == active_route {
                    "btn btn-ghost btn-sm btn-active"
                } else {
                    "btn btn-ghost btn-sm"
                }
            }
            on:click=move |_| router.navigate_route(route.clone())
        >
            {label}
        </button>
    }
}

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let is_authenticated = session.is_authenticated_signal();

    let operator_name = move || {
        session
            .state
            .get()
            .user
            .map(|user| user.name)
            .unwrap_or_default()
    };

    view! {
        <Show when=move || is_authenticated.get()>
            <nav class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <Truck attr:class="h-6 w-6 text-primary" />
                    <a
                        class="btn btn-ghost text-xl"
                        on:click=move |_| router.navigate_route(AppRoute::Dashboard)
                    >
                        "FleetBoard 物流调度台"
                    </a>
                </div>
                <div class="flex-none items-center gap-1">
                    <NavItem route=AppRoute::Dashboard label="仪表盘" />
                    <NavItem route=AppRoute::Simulation label="模拟" />
                    <NavItem route=AppRoute::Drivers label="司机" />
                    <NavItem route=AppRoute::Routes label="路线" />
                    <NavItem route=AppRoute::Orders label="订单" />
                    <span class="badge badge-neutral hidden md:inline-flex mx-2">
                        {operator_name}
                    </span>
                    <button
                        on:click=move |_| logout(session)
                        class="btn btn-outline btn-error btn-sm gap-2"
                    >
                        <LogOut attr:class="h-4 w-4" /> "退出登录"
                    </button>
                </div>
            </nav>
        </Show>
    }
}
