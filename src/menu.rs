use std::io::{self, BufRead, Write};
use trendscope_core::Category;

/// Numbered category menu. Re-prompts until a valid 1-based choice is read;
/// `None` on end of input or when there is nothing to choose from.
pub fn select_category<'a, R, W>(
    categories: &'a [Category],
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<&'a Category>>
where
    R: BufRead,
    W: Write,
{
    if categories.is_empty() {
        writeln!(output, "No categories available.")?;
        return Ok(None);
    }

    writeln!(output, "Available categories:")?;
    for (i, category) in categories.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, category.name)?;
    }

    let mut line = String::new();
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=categories.len()).contains(&choice) => {
                return Ok(Some(&categories[choice - 1]));
            }
            Ok(_) => writeln!(output, "Invalid choice. Please try again.")?,
            Err(_) => writeln!(output, "Please enter a valid number.")?,
        }
    }
}

/// Case-sensitive lookup by name.
pub fn find_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn categories() -> Vec<Category> {
        ["Tech", "Finance", "Sports"]
            .iter()
            .map(|name| Category {
                name: name.to_string(),
                accounts: vec![format!("https://x.com/{}", name.to_lowercase())],
            })
            .collect()
    }

    fn run(input: &str) -> (Option<String>, String) {
        let categories = categories();
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let prompt = "Select a category by number: ";
        let chosen = select_category(&categories, prompt, &mut reader, &mut output)
            .unwrap()
            .map(|c| c.name.clone());
        (chosen, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_lists_in_order_and_selects() {
        let (chosen, output) = run("2\n");
        assert_eq!(chosen.as_deref(), Some("Finance"));
        assert!(output.starts_with("Available categories:\n1. Tech\n2. Finance\n3. Sports\n"));
    }

    #[test]
    fn test_reprompts_on_bad_input() {
        let (chosen, output) = run("0\nabc\n4\n 3 \n");
        assert_eq!(chosen.as_deref(), Some("Sports"));
        assert_eq!(output.matches("Invalid choice. Please try again.").count(), 2);
        assert_eq!(output.matches("Please enter a valid number.").count(), 1);
        assert_eq!(output.matches("Select a category by number: ").count(), 4);
    }

    #[test]
    fn test_end_of_input_aborts() {
        let (chosen, _) = run("9\n");
        assert_eq!(chosen, None);
    }

    #[test]
    fn test_empty_category_list() {
        let mut output = Vec::new();
        let mut input = Cursor::new(Vec::<u8>::new());
        let chosen = select_category(&[], "> ", &mut input, &mut output).unwrap();
        assert!(chosen.is_none());
        assert_eq!(String::from_utf8(output).unwrap(), "No categories available.\n");
    }

    #[test]
    fn test_find_category() {
        let categories = categories();
        assert!(find_category(&categories, "Tech").is_some());
        assert!(find_category(&categories, "tech").is_none());
    }
}
