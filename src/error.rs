use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 外部 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: BoxError,
    },
    /// 请求构建失败
    #[error("LLM 请求构建失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: BoxError,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// OCR 失败
    #[error("OCR Vision Failed: {message}")]
    OcrFailed { message: String },
    /// 回复中找不到 JSON
    #[error("LLM 回复中没有 JSON: {response}")]
    JsonNotFound { response: String },
    /// JSON 解析失败
    #[error("无法解析 LLM 返回的 JSON: {source}")]
    JsonParseFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 缺少必需字段
    #[error("LLM 回复缺少字段: {field}")]
    MissingField { field: String },
    /// 讲解过短，视为敷衍回答
    #[error("讲解过短 ({len} 字符)")]
    ExplanationTooShort { len: usize },
}

/// 外部 API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误状态
    #[error("API返回错误响应 ({endpoint}): status={status}")]
    BadResponse { endpoint: String, status: u16 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败 ({path}): {source}")]
    JsonFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 未收到图片
    #[error("No image data received")]
    EmptyImage,
    /// 提取的文本过短
    #[error("Could not extract text from image ({len} 字符)")]
    TextTooShort { len: usize },
    /// 缺少作业文本
    #[error("Extracted text required")]
    MissingText,
    /// 没有可用的审核频道
    #[error("没有可用的审核频道 (科目: {subject})")]
    NoApprovedChannels { subject: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM请求构建错误
    pub fn llm_request_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Llm(LlmError::RequestBuildFailed {
            source: Box::new(source),
        })
    }

    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
