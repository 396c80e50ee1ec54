//
// Copyright 2024-2026 The Mudlink Authors. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

/// Escapes a string for embedding inside a JSON string value of an outbound
/// GMCP payload. Handles quote, backslash and the control characters JSON
/// requires; everything else (including non-ASCII) passes through unchanged.
pub fn escape_gmcp_string_data(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\u{8}' => result.push_str("\\b"),
            '\u{c}' => result.push_str("\\f"),
            '\t' => result.push_str("\\t"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_controls() {
        let input = "\"\\\u{8}\u{c}\u{ff}\u{100}\r\n";
        assert_eq!(input.chars().count(), 8);
        let result = escape_gmcp_string_data(input);
        assert_eq!(result.chars().count(), 14);
        assert_eq!(result, "\\\"\\\\\\b\\f\u{ff}\u{100}\\r\\n");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(escape_gmcp_string_data("Gandalf says hi"), "Gandalf says hi");
    }
}
