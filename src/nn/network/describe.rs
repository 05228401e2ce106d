/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Network summary 相关方法
 */

use super::error::NetworkError;
use super::Network;
use std::path::Path;

/// 摘要中每个节点的一行
struct SummaryRow {
    index: String,
    kind: String,
    squash: String,
    bias: String,
    incoming: String,
    outgoing: String,
    gated: String,
}

impl Network {
    // ========== 模型摘要（summary）==========

    /// 打印模型摘要
    ///
    /// # 示例
    /// ```ignore
    /// network.summary();
    /// // 输出：
    /// // ┌──────┬──────────┬──────────┬─────────┬──────┬──────┬──────┐
    /// // │ 下标 │ 类型     │ 激活函数 │ 偏置    │ 入边 │ 出边 │ 门控 │
    /// // ├──────┼──────────┼──────────┼─────────┼──────┼──────┼──────┤
    /// // │ 0    │ input    │ LOGISTIC │ -       │ 0    │ 1    │ 0    │
    /// // ...
    /// ```
    pub fn summary(&self) {
        println!("{}", self.summary_string());
    }

    /// 将模型摘要保存到文件
    ///
    /// 根据文件扩展名自动选择格式：
    /// - `.md` → Markdown 表格
    /// - 其他（`.txt` 等）→ Unicode 文本表格
    pub fn save_summary<P: AsRef<Path>>(&self, path: P) -> Result<(), NetworkError> {
        let path = path.as_ref();
        let summary = match path.extension().and_then(|e| e.to_str()) {
            Some("md") => self.summary_markdown(),
            _ => self.summary_string(),
        };
        std::fs::write(path, summary)
            .map_err(|e| NetworkError::Io(format!("保存摘要文件失败: {e}")))
    }

    /// 返回模型摘要的 Markdown 格式字符串
    pub fn summary_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "# 网络摘要: {} 输入, {} 输出\n\n",
            self.input, self.output
        ));
        output.push_str("| 下标 | 类型 | 激活函数 | 偏置 | 入边 | 出边 | 门控 |\n");
        output.push_str("|------|------|----------|------|------|------|------|\n");
        for row in self.summary_rows() {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                row.index, row.kind, row.squash, row.bias, row.incoming, row.outgoing, row.gated
            ));
        }
        output.push_str(&format!("\n{}\n", self.summary_stats().join("  \n")));
        output
    }

    /// 返回模型摘要字符串（Unicode 文本表格，用于控制台输出）
    pub fn summary_string(&self) -> String {
        let headers = ["下标", "类型", "激活函数", "偏置", "入边", "出边", "门控"];
        let rows: Vec<[String; 7]> = self
            .summary_rows()
            .into_iter()
            .map(|r| [r.index, r.kind, r.squash, r.bias, r.incoming, r.outgoing, r.gated])
            .collect();

        // 计算各列宽度
        let widths: Vec<usize> = (0..headers.len())
            .map(|c| {
                rows.iter()
                    .map(|r| Self::display_width(&r[c]))
                    .chain(std::iter::once(Self::display_width(headers[c])))
                    .max()
                    .unwrap_or(4)
            })
            .collect();
        let line = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", segments.join(mid))
        };
        let cells = |values: &[&str]| {
            let padded: Vec<String> = values
                .iter()
                .zip(widths.iter())
                .map(|(v, w)| format!(" {}{} ", v, " ".repeat(w - Self::display_width(v))))
                .collect();
            format!("│{}│\n", padded.join("│"))
        };

        let mut output = String::new();
        output.push_str(&line("┌", "┬", "┐"));
        output.push_str(&cells(&headers[..]));
        output.push_str(&line("├", "┼", "┤"));
        for row in &rows {
            let values: Vec<&str> = row.iter().map(String::as_str).collect();
            output.push_str(&cells(&values[..]));
        }
        output.push_str(&line("└", "┴", "┘"));

        // 统计信息
        for stat in self.summary_stats() {
            output.push_str(&stat);
            output.push('\n');
        }
        output
    }

    fn summary_rows(&self) -> Vec<SummaryRow> {
        self.order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let node = self.nodes.get(id)?;
                Some(SummaryRow {
                    index: i.to_string(),
                    kind: node.kind.name().to_string(),
                    squash: if node.is_input() {
                        "-".to_string()
                    } else {
                        node.squash.name().to_string()
                    },
                    bias: if node.is_input() {
                        "-".to_string()
                    } else {
                        format!("{:.4}", node.bias)
                    },
                    incoming: (node.incoming.len() + usize::from(node.self_connection.is_some()))
                        .to_string(),
                    outgoing: node.outgoing.len().to_string(),
                    gated: node.gated.len().to_string(),
                })
            })
            .collect()
    }

    fn summary_stats(&self) -> Vec<String> {
        let self_connections = self
            .connections
            .values()
            .filter(|c| c.is_self_connection())
            .count();
        let gated = self.connections.values().filter(|c| c.is_gated()).count();
        let recurrent = self.connections.values().filter(|c| c.recurrent).count();
        vec![
            format!("节点数: {}（隐藏 {}）", self.order.len(), self.hidden_nodes().len()),
            format!(
                "连接数: {}（自连接 {}，循环 {}，门控 {}）",
                self.connections.len(),
                self_connections,
                recurrent,
                gated
            ),
        ]
    }

    /// 计算字符串显示宽度（考虑中文字符）
    fn display_width(s: &str) -> usize {
        s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
    }
}
