//! 浏览器原生对话框封装

/// 弹出原生确认框；拿不到 window 时按"未确认"处理
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
