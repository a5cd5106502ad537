use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// Oracle 调用错误
    #[error("上游服务错误: {0}")]
    Upstream(#[from] UpstreamError),
    /// 结构化响应解析错误
    #[error("响应解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 用户输入校验错误
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// 案例存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Oracle (生成式 API) 调用错误
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非 2xx 状态
    #[error("API 返回错误 (状态码 {status}): {}", .message.as_deref().unwrap_or("无错误信息"))]
    BadStatus { status: u16, message: Option<String> },
    /// 响应格式不符合预期
    #[error("响应格式异常: {reason}")]
    MalformedPayload { reason: String },
}

/// 从自由文本中提取 JSON 的失败原因
#[derive(Debug, Error)]
pub enum ParseError {
    /// 文本中没有 JSON 对象
    #[error("响应中未找到 JSON 对象")]
    NoJsonFound,
    /// JSON 语法或结构错误
    #[error("JSON 解析失败: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// 缺少必填字段
    #[error("缺少必填字段: {field}")]
    MissingRequiredField { field: &'static str },
}

/// 用户输入前置条件错误，在发起任何网络请求前拦截
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 必填内容为空
    #[error("{field} 不能为空")]
    EmptyInput { field: &'static str },
    /// 没有保存的案例
    #[error("没有可用的案例，请先生成或提交一个案例")]
    NoCase,
    /// 回答数量与题目数量不一致
    #[error("回答数量 ({answers}) 与题目数量 ({questions}) 不一致")]
    AnswerCountMismatch { questions: usize, answers: usize },
    /// 流程步骤顺序错误
    #[error("当前步骤为 {current}，无法执行: {action}")]
    StepOutOfOrder {
        current: &'static str,
        action: &'static str,
    },
}

/// 案例存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 读取存储文件失败
    #[error("读取存储文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入存储文件失败
    #[error("写入存储文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 存储文件内容损坏
    #[error("存储文件格式错误 ({path}): {source}")]
    Corrupted {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// 序列化失败
    #[error("序列化失败: {0}")]
    Encode(#[source] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("未配置 API 密钥 (环境变量 GEMINI_API_KEY)")]
    MissingApiKey,
    /// 无法读取配置文件
    #[error("无法读取配置文件 {path}: {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件格式错误
    #[error("配置文件格式错误 {path}: {source}")]
    InvalidFile {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(#[source] reqwest::Error),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建空输入错误
    pub fn empty_input(field: &'static str) -> Self {
        AppError::Validation(ValidationError::EmptyInput { field })
    }

    /// 是否为上游服务错误
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Upstream(_))
    }
}

impl UpstreamError {
    /// 创建网络请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        UpstreamError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建响应格式错误
    pub fn malformed(reason: impl Into<String>) -> Self {
        UpstreamError::MalformedPayload {
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
