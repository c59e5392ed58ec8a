//! sable CLI - tokenize, parse, and compile sable stylesheets.

use std::env;
use std::fs;
use std::process;

use sable_ast::{LineMap, Span};
use sable_compiler::CompileError;
use sable_parser::Mode;

mod output;

fn main() {
    output::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: sable lex <file.scss>");
                process::exit(1);
            }
            cmd_lex(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: sable parse [--trace] <file.scss>");
                process::exit(1);
            }
            let trace = args.iter().any(|a| a == "--trace");
            let path = args[2..].iter().find(|a| !a.starts_with("--"));
            match path {
                Some(path) => cmd_parse(path, trace),
                None => {
                    eprintln!("Usage: sable parse [--trace] <file.scss>");
                    process::exit(1);
                }
            }
        }
        "compile" => {
            if args.len() < 3 {
                eprintln!("Usage: sable compile <file.scss>");
                process::exit(1);
            }
            cmd_compile(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("sable 0.1.0");
        }
        other => {
            // Treat as filename
            if other.ends_with(".scss") {
                cmd_compile(other);
            } else {
                eprintln!("Unknown command: {}", other);
                print_usage();
                process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("sable 0.1.0 - compiles sable stylesheets to CSS");
    println!();
    println!("Usage: sable <command> [args]");
    println!();
    println!("Commands:");
    println!("  lex <file>               Tokenize a file and print tokens");
    println!("  parse [--trace] <file>   Parse a file and report the declarations");
    println!("  compile <file>           Compile a file and print the CSS");
    println!("  help                     Show this help");
    println!("  version                  Show version");
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn cmd_lex(path: &str) {
    let source = read_source(path);
    let result = sable_lexer::Lexer::new(&source).tokenize();

    for error in &result.errors {
        show_error(path, &source, error.span, &error.message, None);
    }

    if result.is_ok() {
        for tok in &result.tokens {
            println!("{:4}:{:<4} {:?} {}", tok.span.start, tok.span.end, tok.kind, tok.text);
        }
        println!("\n{}", output::banner_ok("Lex"));
    } else {
        eprintln!("\n{}", output::banner_fail("Lex", result.errors.len()));
        process::exit(1);
    }
}

fn cmd_parse(path: &str, trace: bool) {
    let source = read_source(path);
    let mut mode = Mode::PARSE_COMMENTS;
    if trace {
        mode |= Mode::TRACE;
    }
    let result = sable_parser::parse_str(&source, mode);

    for error in &result.errors {
        show_error(path, &source, error.span, &error.message, error.hint.as_deref());
    }

    if result.is_ok() {
        println!("{} declaration(s)", result.file.decls.len());
        for decl in &result.file.decls {
            println!("{:#?}", decl);
        }
        println!("\n{}", output::banner_ok("Parse"));
    } else {
        eprintln!("\n{}", output::banner_fail("Parse", result.errors.len()));
        process::exit(1);
    }
}

fn cmd_compile(path: &str) {
    let source = read_source(path);
    match sable_compiler::compile_str(&source) {
        Ok(css) => print!("{}", css),
        Err(err) => {
            match &err {
                CompileError::Parse(parse) => {
                    show_error(path, &source, parse.span, &parse.message, parse.hint.as_deref());
                }
                other => {
                    eprintln!("{}: {}", output::error_label(), other);
                }
            }
            eprintln!("\n{}", output::banner_fail("Compile", 1));
            process::exit(1);
        }
    }
}

fn show_error(path: &str, source: &str, span: Span, message: &str, hint: Option<&str>) {
    let map = LineMap::new(source);
    let (line, col) = map.offset_to_line_col(span.start);
    eprintln!("{}: {}", output::error_label(), message);
    eprintln!("  {} {}:{}:{}", output::error_arrow(), path, line, col);
    if let Some(text) = map.line_text(source, line) {
        eprintln!("{} {} {}", output::line_number(line), output::pipe(), text);
        let padding = " ".repeat(col as usize + 5);
        eprintln!("{}{}", padding, output::caret());
    }
    if let Some(hint) = hint {
        eprintln!("  {} {}", output::hint_label(), hint);
    }
    eprintln!();
}
