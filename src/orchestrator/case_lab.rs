//! 案例实验室 - 编排层
//!
//! ## 职责
//!
//! 持有配置、案例存储和内容生成器，为每条命令组装对应的流程。
//! 不做具体业务判断。未配置 API 密钥时仍可查看和提交案例，
//! 需要 Oracle 的命令才会报错。

use std::sync::Arc;

use tracing::info;

use crate::clients::{GeminiClient, Oracle};
use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::infrastructure::LocalStore;
use crate::models::CaseRecord;
use crate::services::{ContentGenerator, SelfTestService};
use crate::utils::truncate_text;
use crate::workflow::{ResolutionFlow, SelfTestFlow};

/// 应用主结构
pub struct App {
    config: Config,
    store: LocalStore,
    generator: Option<ContentGenerator>,
}

impl App {
    /// 使用 Gemini 客户端初始化应用
    ///
    /// 没有 API 密钥时不创建客户端，只能使用存储相关的命令。
    pub fn initialize(config: Config) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Ok(Self {
                store: LocalStore::new(&config.case_store_path),
                generator: None,
                config,
            });
        }

        let client = GeminiClient::new(&config)?;
        Ok(Self::with_oracle(config, Arc::new(client)))
    }

    /// 使用任意 Oracle 初始化应用
    pub fn with_oracle(config: Config, oracle: Arc<dyn Oracle>) -> Self {
        let store = LocalStore::new(&config.case_store_path);
        let generator = ContentGenerator::new(oracle, config.pacing_delay());
        Self {
            config,
            store,
            generator: Some(generator),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    fn generator(&self) -> AppResult<&ContentGenerator> {
        self.generator
            .as_ref()
            .ok_or_else(|| ConfigError::MissingApiKey.into())
    }

    /// 生成新案例并保存，覆盖之前的案例
    pub async fn generate_case(&self) -> AppResult<CaseRecord> {
        let generator = self.generator()?;
        info!("📝 正在生成新案例...");
        let content = generator.generate_case().await?;
        let case = CaseRecord::generated(content);

        self.store.save_case(&case).await?;
        info!("✓ 新案例已保存: {}", truncate_text(&case.content, 60));
        Ok(case)
    }

    /// 保存用户自定义案例
    pub async fn submit_case(&self, content: &str) -> AppResult<CaseRecord> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::empty_input("案例内容"));
        }

        let case = CaseRecord::custom(content);
        self.store.save_case(&case).await?;
        info!("✓ 自定义案例已保存 ({} 字符)", content.chars().count());
        Ok(case)
    }

    /// 读取当前案例
    pub async fn current_case(&self) -> AppResult<CaseRecord> {
        match self.store.load_case().await? {
            Some(case) if !case.content.trim().is_empty() => Ok(case),
            _ => Err(ValidationError::NoCase.into()),
        }
    }

    /// 为当前案例创建解答流程
    pub async fn open_resolution(&self) -> AppResult<ResolutionFlow> {
        let generator = self.generator()?.clone();
        let case = self.current_case().await?;
        Ok(ResolutionFlow::new(case, generator))
    }

    /// 为当前案例创建自测流程
    pub async fn open_self_test(&self, question_count: usize) -> AppResult<SelfTestFlow> {
        let generator = self.generator()?.clone();
        let case = self.current_case().await?;
        let service = SelfTestService::new(generator).with_question_count(question_count);
        Ok(SelfTestFlow::new(case, service))
    }
}
