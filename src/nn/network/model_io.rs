/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network 模型文件 I/O（save_model/load_model）
 *
 * 职责：把 NetworkDescriptor 以 JSON 形式写入/读出文件
 * 依赖：serialization.rs 中的 to_json()/from_json()
 */

use super::error::NetworkError;
use super::types::NetworkConfig;
use super::Network;
use crate::nn::descriptor::NetworkDescriptor;
use std::path::Path;

impl Network {
    /// 保存模型为 `{path}.json`
    ///
    /// # 示例
    /// ```ignore
    /// network.save_model("models/xor")?;
    /// // 生成：models/xor.json
    /// ```
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), NetworkError> {
        let json_path = path.as_ref().with_extension("json");
        if let Some(parent) = json_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| NetworkError::Io(format!("创建目录失败: {e}")))?;
            }
        }
        let json = self
            .to_json()
            .to_json()
            .map_err(|e| NetworkError::Io(format!("序列化网络描述失败: {e}")))?;
        std::fs::write(&json_path, json)
            .map_err(|e| NetworkError::Io(format!("写入 JSON 文件失败: {e}")))
    }

    /// 从 `{path}.json` 加载模型（使用默认配置）
    pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Self, NetworkError> {
        Self::load_model_with_config(path, NetworkConfig::default())
    }

    pub fn load_model_with_config<P: AsRef<Path>>(
        path: P,
        config: NetworkConfig,
    ) -> Result<Self, NetworkError> {
        let json_path = path.as_ref().with_extension("json");
        let json = std::fs::read_to_string(&json_path)
            .map_err(|e| NetworkError::Io(format!("读取 JSON 文件失败: {e}")))?;
        let descriptor = NetworkDescriptor::from_json(&json)
            .map_err(|e| NetworkError::MalformedRecord(format!("解析网络描述失败: {e}")))?;
        Self::from_json_with_config(&descriptor, config)
    }
}
