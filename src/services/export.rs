//! stocks.json 读写
//!
//! 输出为 UTF-8 JSON 数组，非 ASCII 字符原样写入，4 空格缩进，每次运行整体覆盖

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::StockEntry;

/// 配置目录名
pub const CONFIG_DIR: &str = "config";
/// 市值排行输出文件名
pub const STOCKS_FILE: &str = "stocks.json";
/// 名称过滤输出文件名
pub const FILTERED_STOCKS_FILE: &str = "filtered_stocks.json";

/// 默认输出路径：程序所在目录的上一级 config/stocks.json
pub fn default_output_path() -> Result<PathBuf> {
    let exe = env::current_exe().context("无法获取程序路径")?;
    let exe_dir = exe
        .parent()
        .ok_or_else(|| anyhow!("程序路径没有上级目录: {}", exe.display()))?;
    Ok(output_path_from(exe_dir))
}

/// 以给定目录为基准计算 ../config/stocks.json
pub fn output_path_from(base_dir: &Path) -> PathBuf {
    base_dir.join("..").join(CONFIG_DIR).join(STOCKS_FILE)
}

/// 过滤结果与输入文件放在同一目录
pub fn filtered_path_for(input: &Path) -> PathBuf {
    match input.parent() {
        Some(dir) => dir.join(FILTERED_STOCKS_FILE),
        None => PathBuf::from(FILTERED_STOCKS_FILE),
    }
}

/// 按 4 空格缩进序列化，非 ASCII 字符不转义，末尾不带换行
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// 写入股票列表，覆盖已有文件；上级目录不存在时自动创建
pub fn write_stocks(path: &Path, entries: &[StockEntry]) -> Result<()> {
    let bytes = to_pretty_json(entries)?;

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| format!("创建目录 {} 失败", dir.display()))?;
        }
    }

    fs::write(path, bytes).with_context(|| format!("写入 {} 失败", path.display()))?;
    log::info!("已写入 {} 只股票到 {}", entries.len(), path.display());
    Ok(())
}

/// 读取已导出的股票列表
pub fn load_stocks(path: &Path) -> Result<Vec<StockEntry>> {
    let content = fs::read_to_string(path).with_context(|| format!("读取 {} 失败", path.display()))?;
    let entries: Vec<StockEntry> =
        serde_json::from_str(&content).with_context(|| format!("解析 {} 失败", path.display()))?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, name: &str) -> StockEntry {
        StockEntry {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_pretty_json_format() {
        let entries = vec![entry("601398", "工商银行"), entry("600519", "贵州茅台")];
        let bytes = to_pretty_json(&entries).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let expected = "[\n    {\n        \"code\": \"601398\",\n        \"name\": \"工商银行\"\n    },\n    {\n        \"code\": \"600519\",\n        \"name\": \"贵州茅台\"\n    }\n]";
        assert_eq!(text, expected);
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_pretty_json_empty() {
        assert_eq!(to_pretty_json::<[StockEntry]>(&[]).unwrap(), b"[]");
    }

    #[test]
    fn test_write_overwrites_and_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join(STOCKS_FILE);

        let long = vec![entry("1", "一"), entry("2", "二"), entry("3", "三")];
        write_stocks(&path, &long).unwrap();

        let short = vec![entry("2", "二")];
        write_stocks(&path, &short).unwrap();
        let first = fs::read(&path).unwrap();
        write_stocks(&path, &short).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(load_stocks(&path).unwrap(), short);
    }

    #[test]
    fn test_written_file_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STOCKS_FILE);
        write_stocks(&path, &[entry("000001", "平安银行")]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let obj = value[0].as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["code"], "000001");
        assert_eq!(obj["name"], "平安银行");
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_stocks(&dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.json"));
    }

    #[test]
    fn test_paths() {
        let base = Path::new("/opt/app/bin");
        assert_eq!(output_path_from(base), PathBuf::from("/opt/app/bin/../config/stocks.json"));
        assert_eq!(
            filtered_path_for(Path::new("/opt/app/config/stocks.json")),
            PathBuf::from("/opt/app/config/filtered_stocks.json")
        );
        assert_eq!(filtered_path_for(Path::new("stocks.json")), PathBuf::from("filtered_stocks.json"));
    }
}
