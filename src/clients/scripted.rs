//! 预设响应的 Oracle
//!
//! 按顺序返回预先排好的响应，并记录收到的提示词。用于测试和离线演示。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::clients::Oracle;
use crate::error::UpstreamError;

#[derive(Default)]
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String, UpstreamError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 依次返回给定文本
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let oracle = Self::new();
        for response in responses {
            oracle.push_ok(response);
        }
        oracle
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.lock_responses().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, error: UpstreamError) {
        self.lock_responses().push_back(Err(error));
    }

    /// 已收到的提示词（按调用顺序）
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, UpstreamError>>> {
        // 锁中毒时沿用内部数据
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::malformed("没有预设的响应")))
    }
}
