use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// 提示输入的结果：用户输入的值，或用户取消了当前操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt<T> {
    Value(T),
    Cancelled,
}

/// `q` / `quit`（不区分大小写）
pub fn is_quit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit")
}

/// 交互式输入输出
///
/// 每次提示都可以用 `q` / `quit` 取消；输入结束（EOF）同样视为取消。
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    /// 显示提示并读取一行（去掉首尾空白）
    pub fn read_input(&mut self, prompt: &str) -> Result<Prompt<String>> {
        writeln!(self.output, "\nEnter 'q'/'quit' to exit the current operation.")?;
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        // 非 UTF-8 字节按替换字符解码，不中断会话
        let mut buf = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut buf)
            .context("Failed to read from input")?;

        if read == 0 {
            writeln!(self.output)?;
            return Ok(Prompt::Cancelled);
        }

        let line = String::from_utf8_lossy(&buf);
        let input = line.trim();
        if is_quit_command(input) {
            writeln!(self.output, " ❌ User has cancelled current operation ❌")?;
            return Ok(Prompt::Cancelled);
        }

        Ok(Prompt::Value(input.to_string()))
    }
}
