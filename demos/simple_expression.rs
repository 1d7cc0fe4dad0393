use funct_rs::ast::Parser;

fn main() {
    pretty_env_logger::init();

    let parser = Parser::standard().expect("standard preset");

    let expression = "-cos x + x^2 / 2";
    let ast = parser.parse(expression).expect("Failed to parse");
    println!("Parsed: {}", ast);

    for x in [0.0, 0.5, 1.0, 2.0] {
        match ast.eval(x) {
            Ok(result) => println!("f({}) = {}", x, result),
            Err(err) => println!("Error: {}", err),
        }
    }

    for broken in ["(2+3", "2 3", "2 @ 3", "foo x"] {
        if let Err(err) = parser.parse(broken) {
            println!("{:?}: {}", broken, err);
        }
    }
}
