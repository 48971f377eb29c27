//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `pagination_engine` - 分页引擎
//! - 决定发起哪些页、何时停止
//! - 控制预取窗口和请求间隔
//! - 按页码顺序汇总记录
//!
//! ### `app` - 应用入口
//! - 根据配置组装抓取器、引擎和输出
//! - 决定失败时是否写出部分结果
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! pagination_engine (处理整个分页序列)
//!     ↓
//! workflow::PageFlow (处理单页)
//!     ↓
//! services (能力层：classify / extract / sink)
//!     ↓
//! infrastructure (基础设施：PageFetcher)
//! ```

pub mod app;
pub mod pagination_engine;

pub use app::App;
pub use pagination_engine::{EngineState, PaginationEngine, RunOutcome, RunReport};
