use tablegen_core::ColumnDescriptor;

use crate::{escape_html, write_head};

/// Static table with one placeholder row.
pub(crate) fn render(columns: &[ColumnDescriptor]) -> String {
    let mut out = String::new();
    write_head(&mut out, columns);

    out.push_str("  <tbody>\n");
    out.push_str("    <tr>\n");
    for column in columns {
        out.push_str(&format!("      <td><!-- {} --></td>\n", escape_html(&column.name)));
    }
    out.push_str("    </tr>\n");
    out.push_str("  </tbody>\n");
    out.push_str("</table>");
    out
}
