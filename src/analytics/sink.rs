use super::VisitDetail;

/// 访问日志 Sink
///
/// 处理器只依赖这个窄接口，测试中可以替换为内存实现。
#[async_trait::async_trait]
pub trait VisitSink: Send + Sync {
    /// 记录单条访问日志
    async fn record_visit(&self, detail: VisitDetail) -> anyhow::Result<()>;
}
