use tablegen_core::ColumnDescriptor;

use crate::{is_money_column, write_head};

/// Table with a `{{#rows}}` section; money columns are right-aligned.
pub(crate) fn render(columns: &[ColumnDescriptor]) -> String {
    let mut out = String::new();
    write_head(&mut out, columns);

    out.push_str("  <tbody>\n");
    out.push_str("    {{#rows}}\n");
    out.push_str("    <tr>\n");
    for column in columns {
        let name = &column.name;
        if is_money_column(name) {
            out.push_str(&format!("      <td class=\"text-end\">{{{{{name}}}}}</td>\n"));
        } else {
            out.push_str(&format!("      <td>{{{{{name}}}}}</td>\n"));
        }
    }
    out.push_str("    </tr>\n");
    out.push_str("    {{/rows}}\n");
    out.push_str("  </tbody>\n");
    out.push_str("</table>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::column;

    #[test]
    fn test_mustache_section() {
        let out = render(&[column("name", "Customer"), column("price", "Unit price")]);

        assert!(out.contains("    {{#rows}}\n    <tr>\n"));
        assert!(out.contains("<td>{{name}}</td>"));
        assert!(out.contains("<td class=\"text-end\">{{price}}</td>"));
        assert!(out.contains("    </tr>\n    {{/rows}}\n"));
        assert!(out.contains("<th>Unit price</th>"));
    }
}
