//! FleetBoard 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route` / `web::router`: 路由领域模型与核心引擎
//! - `session`: 认证会话管理
//! - `api`: REST 边界客户端
//! - `sync`: 实体列表同步器
//! - `components`: UI 组件层

mod api;
mod config;
mod session;
mod sync;

mod components {
    pub mod dashboard;
    pub mod drivers;
    mod icons;
    pub mod login;
    pub mod navbar;
    pub mod orders;
    mod report;
    pub mod routes;
    pub mod simulation;
    pub mod simulation_details;
}

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod date;
    pub mod dialog;
    pub mod route;
    pub mod router;
    mod storage;

    pub use storage::LocalStorage;
}

use crate::components::dashboard::DashboardPage;
use crate::components::drivers::DriversPage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::orders::OrdersPage;
use crate::components::routes::RoutesPage;
use crate::components::simulation::SimulationPage;
use crate::components::simulation_details::SimulationDetailsPage;
use crate::session::SessionContext;

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Simulation => view! { <SimulationPage /> }.into_any(),
        AppRoute::SimulationDetails(id) => {
            view! { <SimulationDetailsPage id=id /> }.into_any()
        }
        AppRoute::Drivers => view! { <DriversPage /> }.into_any(),
        AppRoute::Routes => view! { <RoutesPage /> }.into_any(),
        AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建会话上下文
    let session_ctx = SessionContext::new();
    provide_context(session_ctx);

    // 2. 启动恢复：乐观水合缓存身份，同时发起后台校验
    session::restore(session_ctx);

    view! {
        // 3. 路由器组件：注入会话信号实现守卫
        <Router
            is_authenticated=session_ctx.is_authenticated_signal()
            session_resolved=session_ctx.resolved_signal()
        >
            <div class="min-h-screen bg-base-200 font-sans">
                <Navbar />
                <main>
                    <RouterOutlet matcher=route_matcher />
                </main>
            </div>
        </Router>
    }
}
