//! 运行配置
//!
//! 后端地址在编译期确定：默认指向本地开发服务，
//! 发布构建用 `FLEETBOARD_API_URL` 环境变量覆盖。

const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// 规范化后的后端基地址（不带结尾斜杠）
pub fn api_base_url() -> String {
    option_env!("FLEETBOARD_API_URL")
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_has_no_trailing_slash() {
        assert!(!api_base_url().ends_with('/'));
    }
}
