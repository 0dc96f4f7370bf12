//! 会话管理模块
//!
//! 管理认证会话的完整生命周期：启动恢复、登录、注销、强制登出。
//! 两个持久化键（凭据与资料）只允许本模块读写，并且永远一起写、
//! 一起清。路由服务通过注入的会话信号决定页面可达性。

use crate::api::FleetApi;
use crate::web::LocalStorage;
use fleetboard_shared::UserProfile;
use fleetboard_shared::protocol::{LoginRequest, LoginResponse};
use leptos::prelude::*;
use leptos::task::spawn_local;

const STORAGE_TOKEN_KEY: &str = "fleetboard_token";
const STORAGE_USER_KEY: &str = "fleetboard_user";

/// 会话状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// 无会话
    #[default]
    Anonymous,
    /// 凭据校验中（启动恢复或登录请求在途）
    Verifying,
    /// 凭据已被服务端确认
    Authenticated,
    /// 最近一次登录尝试失败
    Failed,
}

/// 会话状态
///
/// 持有凭据只是 `Authenticated` 的必要条件：每个进程生命周期内
/// 凭据至少要被服务端确认一次（`restore` 或 `login`）。
#[derive(Clone, Default)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub status: SessionStatus,
    pub error: Option<String>,
    /// 启动恢复是否已经完成；完成前路由守卫保持 Loading
    pub resolved: bool,
}

/// 会话上下文
///
/// 写端不公开：内存状态和持久化键的所有变更都走本模块的操作。
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: ReadSignal<SessionState>,
    set_state: WriteSignal<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::default());
        Self { state, set_state }
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().status == SessionStatus::Authenticated)
    }

    /// 会话已决信号（用于路由服务注入）
    pub fn resolved_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().resolved)
    }

    /// 当前凭据；每次发出请求时读取
    pub fn token(&self) -> Option<String> {
        self.state.try_get_untracked().and_then(|state| state.token)
    }

    /// API 边界收到未授权响应时调用：清会话，跳转交给路由守卫
    pub fn force_logout(&self) {
        web_sys::console::warn_1(&"[Session] Credential rejected by server, logging out.".into());
        self.clear();
    }

    /// 同步清除持久化键与内存状态（两个键永远一起清）
    fn clear(&self) {
        LocalStorage::delete(STORAGE_TOKEN_KEY);
        LocalStorage::delete(STORAGE_USER_KEY);
        let _ = self.set_state.try_update(|state| {
            *state = SessionState {
                resolved: true,
                ..SessionState::default()
            };
        });
    }

    fn update(&self, mutate: impl FnOnce(&mut SessionState)) {
        let _ = self.set_state.try_update(mutate);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

/// 读取持久化的 {凭据, 资料}；缺任何一个都视为没有会话
fn read_persisted() -> Option<(String, UserProfile)> {
    let token = LocalStorage::get(STORAGE_TOKEN_KEY)?;
    let user = LocalStorage::get_json::<UserProfile>(STORAGE_USER_KEY)?;
    Some((token, user))
}

/// 两个键一起写入
fn persist(token: &str, user: &UserProfile) {
    LocalStorage::set(STORAGE_TOKEN_KEY, token);
    LocalStorage::set_json(STORAGE_USER_KEY, user);
}

/// 启动恢复：乐观水合缓存的身份，同时向服务端发起 who-am-i 校验
///
/// 校验成功后用服务端确认过的资料替换缓存；任何失败（网络或认证）
/// 都吞掉并清会话退回匿名态，绝不让启动流程崩溃。
pub fn restore(ctx: SessionContext) {
    let Some((token, cached_user)) = read_persisted() else {
        // 没有完整的持久化会话；把可能残留的单个键一并清掉
        ctx.clear();
        return;
    };

    ctx.update(|state| {
        state.token = Some(token);
        state.user = Some(cached_user);
        state.status = SessionStatus::Verifying;
        state.error = None;
        state.resolved = false;
    });

    spawn_local(async move {
        let api = FleetApi::new(ctx);
        match api.me().await {
            Ok(profile) => {
                LocalStorage::set_json(STORAGE_USER_KEY, &profile);
                ctx.update(|state| {
                    state.user = Some(profile);
                    state.status = SessionStatus::Authenticated;
                    state.resolved = true;
                });
            }
            Err(err) => {
                web_sys::console::warn_1(
                    &format!("[Session] Restore verification failed: {err}").into(),
                );
                ctx.clear();
            }
        }
    });
}

/// 登录；成功后持久化 {凭据, 资料} 并返回服务端确认的资料
///
/// 失败只标记 `Failed` 并给出消息（服务端消息优先），
/// 不触碰已持久化的旧会话。
pub async fn login(ctx: SessionContext, credentials: LoginRequest) -> Result<UserProfile, String> {
    ctx.update(|state| {
        state.status = SessionStatus::Verifying;
        state.error = None;
    });

    let api = FleetApi::new(ctx);
    match api.login(&credentials).await {
        Ok(LoginResponse { token, user }) => {
            persist(&token, &user);
            let profile = user.clone();
            ctx.update(|state| {
                state.token = Some(token);
                state.user = Some(user);
                state.status = SessionStatus::Authenticated;
                state.error = None;
                state.resolved = true;
            });
            Ok(profile)
        }
        Err(err) => {
            let message = err.message();
            ctx.update(|state| {
                state.status = SessionStatus::Failed;
                state.error = Some(message.clone());
            });
            Err(message)
        }
    }
}

/// 注销：同步清掉持久化与内存会话，不调用服务端
///
/// 跳转由路由服务的会话监听自动处理。
pub fn logout(ctx: SessionContext) {
    ctx.clear();
}
