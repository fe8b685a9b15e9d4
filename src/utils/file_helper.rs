use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use log::{debug, error};

use crate::error::{HalError, HalResult};

/// 控制节点写入工具
/// 内核节点只打开不创建，写入失败只影响当前节点
pub struct FileHelper;

impl FileHelper {
    /// 写入字符串，短写同样视为失败
    pub fn write_string<P: AsRef<Path>>(path: P, content: &str) -> HalResult<()> {
        let path = path.as_ref();
        let io_err = |source: io::Error| HalError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(io_err)?;

        let written = file.write(content.as_bytes()).map_err(io_err)?;
        if written != content.len() {
            return Err(io_err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write ({written} of {} bytes)", content.len()),
            )));
        }

        debug!("Wrote {content} to {}", path.display());
        Ok(())
    }

    /// 整数以十进制写入
    pub fn write_int<P: AsRef<Path>>(path: P, value: i64) -> HalResult<()> {
        Self::write_string(path, &value.to_string())
    }

    /// 尝试写入，失败时记录错误并继续执行
    pub fn write_string_safe<P: AsRef<Path>>(path: P, content: &str) -> bool {
        match Self::write_string(path, content) {
            Ok(()) => true,
            Err(e) => {
                error!("{e} (continuing execution)");
                false
            }
        }
    }

    pub fn write_int_safe<P: AsRef<Path>>(path: P, value: i64) -> bool {
        Self::write_string_safe(path, &value.to_string())
    }

    /// 读取节点内容（去除首尾空白）
    pub fn read_trimmed<P: AsRef<Path>>(path: P) -> HalResult<String> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|source| HalError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
