//! 实体列表同步器
//!
//! 司机/路线/订单三个管理页共用的状态机：本地有序列表镜像服务端
//! 集合，变更全部采用"服务端确认后再落地"。每个页面挂载时实例化
//! 一份，不跨页面共享；离开页面后在途响应通过纪元号作废，绝不会
//! 写进已卸载视图的状态。

use crate::api::{ApiError, FleetApi};
use fleetboard_shared::collection;
use fleetboard_shared::protocol::Resource;
use leptos::prelude::*;

pub struct ResourceStore<R: Resource + Send + Sync> {
    api: StoredValue<FleetApi>,
    /// 展示顺序 = 最近一次全量加载的顺序，创建追加尾部
    pub items: RwSignal<Vec<R>>,
    /// 首次取数在途；页面据此渲染加载占位
    pub loading: RwSignal<bool>,
    /// 最近一次失败的提示文本；成功操作会清掉
    pub error: RwSignal<Option<String>>,
    /// 有变更请求在途；页面据此禁用触发控件，防止重复提交
    pub busy: RwSignal<bool>,
    /// 加载纪元：新一轮 load 或页面卸载使旧响应作废
    epoch: StoredValue<u64>,
}

// 手写而不是 derive：句柄本身永远可复制，与 R 是否 Copy 无关
impl<R: Resource + Send + Sync> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource + Send + Sync> Copy for ResourceStore<R> {}

impl<R: Resource + Send + Sync> ResourceStore<R> {
    pub fn new(api: FleetApi) -> Self {
        Self {
            api: StoredValue::new(api),
            items: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            busy: RwSignal::new(false),
            epoch: StoredValue::new(0),
        }
    }

    fn api(&self) -> FleetApi {
        self.api.get_value()
    }

    fn begin_epoch(&self) -> u64 {
        self.epoch
            .try_update_value(|epoch| {
                *epoch += 1;
                *epoch
            })
            .unwrap_or(0)
    }

    fn epoch_is_current(&self, epoch: u64) -> bool {
        self.epoch.try_get_value() == Some(epoch)
    }

    fn report(&self, action: &str, err: ApiError) {
        let _ = self
            .error
            .try_set(Some(format!("{action}{}失败: {}", R::LABEL, err.message())));
    }

    /// 全量加载并整体替换本地列表
    ///
    /// 失败时保留旧列表（过期但可用），只设置错误提示。
    pub async fn load(self) {
        let epoch = self.begin_epoch();
        self.loading.set(true);

        let result = self.api().list::<R>().await;

        // 视图已离开或已开始新一轮加载：丢弃本次响应
        if !self.epoch_is_current(epoch) {
            return;
        }
        match result {
            Ok(list) => {
                let _ = self.error.try_set(None);
                let _ = self.items.try_set(list);
            }
            Err(err) => self.report("加载", err),
        }
        let _ = self.loading.try_set(false);
    }

    /// 创建：服务端确认后才把带权威 id 的实体追加到列表尾部
    ///
    /// 返回是否成功，失败时调用方保留表单内容供修正。
    pub async fn create(self, draft: R::Draft) -> bool {
        self.busy.set(true);
        let result = self.api().create::<R>(&draft).await;
        let ok = match result {
            Ok(created) => {
                let _ = self.items.try_update(|items| items.push(created));
                let _ = self.error.try_set(None);
                true
            }
            Err(err) => {
                self.report("保存", err);
                false
            }
        };
        let _ = self.busy.try_set(false);
        ok
    }

    /// 更新：服务端确认后把补丁原位合并进命中的条目
    ///
    /// 长度、顺序与补丁外的字段都保持不变。
    pub async fn update(self, id: String, patch: R::Patch) -> bool {
        self.busy.set(true);
        let result = self.api().update::<R>(&id, &patch).await;
        let ok = match result {
            Ok(()) => {
                let _ = self.items.try_update(|items| {
                    collection::merge_patch(items, &id, &patch);
                });
                let _ = self.error.try_set(None);
                true
            }
            Err(err) => {
                self.report("保存", err);
                false
            }
        };
        let _ = self.busy.try_set(false);
        ok
    }

    /// 删除：调用方必须先完成确认步骤再调用
    pub async fn remove(self, id: String) -> bool {
        self.busy.set(true);
        let result = self.api().remove::<R>(&id).await;
        let ok = match result {
            Ok(()) => {
                let _ = self.items.try_update(|items| {
                    collection::remove_by_id(items, &id);
                });
                let _ = self.error.try_set(None);
                true
            }
            Err(err) => {
                self.report("删除", err);
                false
            }
        };
        let _ = self.busy.try_set(false);
        ok
    }
}
