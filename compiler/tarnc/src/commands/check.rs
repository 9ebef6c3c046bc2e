use super::read_file;

/// `tarn check`: parse only, reporting the first syntax error.
pub(crate) fn check_file(path: &str) -> i32 {
    let source = match read_file(path) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return 1;
        }
    };
    match tarn_parse::parse(&source) {
        Ok(module) => {
            println!("{path}: ok ({} statements)", module.body.len());
            0
        }
        Err(err) => {
            eprintln!("{path}:{}: SyntaxError: {}", err.line(), err.message);
            1
        }
    }
}
