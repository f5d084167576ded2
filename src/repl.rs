use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::devtools;
use crate::error::ErrorWithSpan;
use crate::reader;
use crate::runtime::Interpreter;

pub struct REPL {
    interpreter: Interpreter,
    pub print_ast: bool,
}

impl REPL {
    pub fn new(print_ast: bool) -> Self {
        REPL { interpreter: Interpreter::new(), print_ast }
    }

    pub fn rep(&self, input: &str) -> Result<String, ErrorWithSpan> {
        let form = reader::read(input)?;
        if self.print_ast {
            println!("{}", devtools::pretty_print_ast(&form));
        }
        let value = self
            .interpreter
            .evaluate(&form)
            .map_err(|error| ErrorWithSpan::bare(error, input))?;
        Ok(value.to_string())
    }

    pub fn run(&self) {
        let mut rl = DefaultEditor::new().unwrap();
        if rl.load_history(".sprout-history").is_err() {}

        'repl_loop: loop {
            let readline = rl.readline("> ");
            match readline {
                Ok(line) => {
                    if let Err(err) = rl.add_history_entry(line.as_str()) {
                        eprintln!("Error adding to history: {:?}", err);
                    }

                    if let Err(err) = rl.save_history(".sprout-history") {
                        eprintln!("Error saving history: {:?}", err);
                    }

                    if !line.is_empty() {
                        match self.rep(&line) {
                            Ok(out) => println!("{}", out),
                            Err(e) => {
                                println!("{}", e.format_error());
                                continue 'repl_loop;
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => continue 'repl_loop,
                Err(ReadlineError::Eof) => break 'repl_loop,
                Err(err) => {
                    println!("Error: {:?}", err);
                    break 'repl_loop;
                }
            }
        }
    }
}
