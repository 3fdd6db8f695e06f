use dice_postfix::RollContext;
use std::io::{self, BufRead, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut ctx = RollContext::default();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return match ctx.roll(&args.join(" ")) {
            Ok(r) => {
                println!("{}", r);
                Ok(())
            }
            Err(why) => Err(why.into()),
        };
    }

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let expression = line.trim();
        if !expression.is_empty() {
            match ctx.roll(expression) {
                Ok(r) => println!("{}", r),
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
