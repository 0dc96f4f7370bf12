//! 时间展示模块
//!
//! 服务端的时间戳是 RFC 3339 字符串，客户端不解析其语义，
//! 只借浏览器的 `Date` 把它变成本地化的展示文本。

use wasm_bindgen::JsValue;

/// 把 RFC 3339 字符串格式化为本地时间文本
///
/// 解析失败时原样返回输入，展示层永远有东西可显示。
pub fn format_timestamp(raw: &str) -> String {
    let ms = js_sys::Date::parse(raw);
    if ms.is_nan() {
        return raw.to_string();
    }
    let date = js_sys::Date::new(&JsValue::from_f64(ms));
    String::from(date.to_locale_string("zh-CN", &JsValue::UNDEFINED))
}
