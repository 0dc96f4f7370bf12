//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了控制台的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面
    Login,
    /// 仪表盘 (默认路由，需要认证)
    #[default]
    Dashboard,
    /// 模拟页面 (需要认证)
    Simulation,
    /// 单次模拟的完整明细 (需要认证)
    SimulationDetails(String),
    /// 司机管理 (需要认证)
    Drivers,
    /// 路线管理 (需要认证)
    Routes,
    /// 订单管理 (需要认证)
    Orders,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/simulation" => Self::Simulation,
            "/drivers" => Self::Drivers,
            "/routes" => Self::Routes,
            "/orders" => Self::Orders,
            _ => match path.strip_prefix("/simulation/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::SimulationDetails(id.to_string())
                }
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Simulation => "/simulation".to_string(),
            Self::SimulationDetails(id) => format!("/simulation/{id}"),
            Self::Drivers => "/drivers".to_string(),
            Self::Routes => "/routes".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页，且没有记录被打断的目的地时）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for route in [
            AppRoute::Login,
            AppRoute::Dashboard,
            AppRoute::Simulation,
            AppRoute::SimulationDetails("sim-42".to_string()),
            AppRoute::Drivers,
            AppRoute::Routes,
            AppRoute::Orders,
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn root_is_the_dashboard() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
    }

    #[test]
    fn unknown_paths_fall_through_to_not_found() {
        assert_eq!(AppRoute::from_path("/unknown"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/simulation/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/simulation/a/b"), AppRoute::NotFound);
    }

    #[test]
    fn everything_but_login_and_not_found_is_protected() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::Simulation.requires_auth());
        assert!(AppRoute::SimulationDetails("x".to_string()).requires_auth());
        assert!(AppRoute::Drivers.requires_auth());
        assert!(AppRoute::Routes.requires_auth());
        assert!(AppRoute::Orders.requires_auth());
    }
}
