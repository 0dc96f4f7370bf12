//! API 边界客户端
//!
//! 所有对后端 REST 服务的调用都从这里出去：统一拼接地址、
//! 附加 Bearer 凭据、归类失败。未授权响应在这一层直接触发
//! 全局强制登出，页面代码不需要各自处理。

use crate::session::SessionContext;
use fleetboard_shared::protocol::{
    ErrorBody, LoginRequest, LoginResponse, PATH_LOGIN, PATH_ME, PATH_SIMULATE,
    PATH_SIMULATE_LATEST, Resource, SimulationRequest,
};
use fleetboard_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION, SimulationResult, UserProfile};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 客户端侧的失败归类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 网络不可达、超时或响应不可解析；永远非致命
    Transport(String),
    /// 凭据无效；已在边界处触发强制登出，本地不可恢复
    Unauthorized,
    /// 资源不存在；是否当作错误由调用方决定
    NotFound,
    /// 服务端拒绝（校验失败等），消息原样转给界面
    Server { status: u16, message: Option<String> },
}

impl ApiError {
    /// 面向操作员的提示文本
    pub fn message(&self) -> String {
        match self {
            ApiError::Transport(detail) => format!("网络错误: {detail}"),
            ApiError::Unauthorized => "登录已失效，请重新登录".to_string(),
            ApiError::NotFound => "请求的资源不存在".to_string(),
            ApiError::Server { status, message } => message
                .clone()
                .unwrap_or_else(|| format!("请求失败 (HTTP {status})")),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// 按 HTTP 状态码归类
fn classify(status: u16, message: Option<String>) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized,
        404 => ApiError::NotFound,
        _ => ApiError::Server { status, message },
    }
}

fn transport(err: gloo_net::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

#[derive(Clone)]
pub struct FleetApi {
    base_url: String,
    session: SessionContext,
}

impl FleetApi {
    pub fn new(session: SessionContext) -> Self {
        Self {
            base_url: crate::config::api_base_url(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 附加当前会话的 Bearer 凭据（没有凭据时原样返回）
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.header(HEADER_AUTHORIZATION, &format!("{BEARER_PREFIX}{token}")),
            None => builder,
        }
    }

    /// 把非 2xx 响应归类为错误
    ///
    /// `guarded` 表示这是带凭据的调用：401/403 触发全局强制登出。
    /// 登录请求本身传 false，它的 401 只是校验失败，消息要回到表单。
    async fn fail(&self, response: Response, guarded: bool) -> ApiError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);
        match classify(status, message.clone()) {
            ApiError::Unauthorized if guarded => {
                self.session.force_logout();
                ApiError::Unauthorized
            }
            ApiError::Unauthorized => ApiError::Server { status, message },
            other => other,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .authorize(Request::get(&self.url(path)))
            .send()
            .await
            .map_err(transport)?;
        if !response.ok() {
            return Err(self.fail(response, true).await);
        }
        response.json::<T>().await.map_err(transport)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .authorize(Request::post(&self.url(path)))
            .json(body)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        if !response.ok() {
            return Err(self.fail(response, true).await);
        }
        response.json::<T>().await.map_err(transport)
    }

    async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::put(&self.url(path)))
            .json(body)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        if !response.ok() {
            return Err(self.fail(response, true).await);
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .authorize(Request::delete(&self.url(path)))
            .send()
            .await
            .map_err(transport)?;
        if !response.ok() {
            return Err(self.fail(response, true).await);
        }
        Ok(())
    }

    // =====================================================
    // 认证
    // =====================================================

    /// 凭据签发；唯一不带 Bearer 的调用
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = Request::post(&self.url(PATH_LOGIN))
            .json(credentials)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        if !response.ok() {
            return Err(self.fail(response, false).await);
        }
        response.json::<LoginResponse>().await.map_err(transport)
    }

    /// 会话校验 (who-am-i)
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get_json(PATH_ME).await
    }

    // =====================================================
    // 实体 CRUD（按 Resource 泛化）
    // =====================================================

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.get_json(R::ENDPOINT).await
    }

    /// 创建并返回带权威 id 的完整实体
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, ApiError> {
        self.post_json(R::ENDPOINT, draft).await
    }

    /// 更新；本地合并由调用方按补丁完成，响应体不使用
    pub async fn update<R: Resource>(&self, id: &str, patch: &R::Patch) -> Result<(), ApiError> {
        self.put_json(&format!("{}/{id}", R::ENDPOINT), patch).await
    }

    pub async fn remove<R: Resource>(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("{}/{id}", R::ENDPOINT)).await
    }

    // =====================================================
    // 模拟
    // =====================================================

    pub async fn run_simulation(
        &self,
        params: &SimulationRequest,
    ) -> Result<SimulationResult, ApiError> {
        self.post_json(PATH_SIMULATE, params).await
    }

    /// 最近一次模拟；还没有任何模拟（404）不是错误，是空数据
    pub async fn latest_simulation(&self) -> Result<Option<SimulationResult>, ApiError> {
        match self.get_json::<SimulationResult>(PATH_SIMULATE_LATEST).await {
            Ok(result) => Ok(Some(result)),
            Err(ApiError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn simulation_by_id(&self, id: &str) -> Result<SimulationResult, ApiError> {
        self.get_json(&format!("{PATH_SIMULATE}/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_statuses_are_global() {
        assert_eq!(classify(401, None), ApiError::Unauthorized);
        assert_eq!(classify(403, Some("x".into())), ApiError::Unauthorized);
    }

    #[test]
    fn missing_resources_are_not_server_errors() {
        assert_eq!(classify(404, None), ApiError::NotFound);
    }

    #[test]
    fn validation_failures_keep_the_server_message() {
        let err = classify(400, Some("Route R9 not found".into()));
        assert_eq!(err.message(), "Route R9 not found");
    }

    #[test]
    fn server_errors_without_a_body_get_a_generic_message() {
        let err = classify(500, None);
        assert_eq!(err.message(), "请求失败 (HTTP 500)");
    }
}
