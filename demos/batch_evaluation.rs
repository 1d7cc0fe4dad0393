use funct_rs::ast::{CachedParser, Parser};

fn main() {
    pretty_env_logger::init();

    let mut parser = CachedParser::new(Parser::standard().unwrap(), 16);

    let expressions = ["sin x", "x^3 - 2*x", "sin x"];
    for expression in expressions {
        let ast = parser.parse(expression).unwrap();
        let points = ast.sample(-2.0, 2.0, 9).unwrap();
        println!("{}:", ast);
        for (x, y) in points {
            println!("  {:>5.2} -> {:>8.4}", x, y);
        }
    }
    println!("cached trees: {}", parser.len());
}
