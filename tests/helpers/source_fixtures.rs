//! Complete Ballerina programs shared by the integration tests.

pub const HELLO_SERVICE: &str = r#"
import ballerina/http;
import ballerina/log;

listener http:Listener helloEp = new(9090);

# A greeting service
@http:ServiceConfig { basePath: "/hello" }
service hello on helloEp {
    @http:ResourceConfig { methods: ["GET"], path: "/{name}" }
    resource function greet(http:Caller caller, http:Request req, string name) returns error? {
        http:Response res = new;
        res.setPayload(string `Hello, ${name}!`);
        check caller->respond(res);
        log:printInfo("greeted " + name);
    }
}
"#;

pub const ORDER_PROCESSING: &str = r#"
import ballerina/io;

type Item record {|
    string name;
    int quantity;
    float price;
|};

type Purchase record {
    string id;
    Item[] items;
    map<string> tags?;
};

const float TAX_RATE = 0.08;

type Counter object {
    private int count = 0;

    public function increment(int step = 1) returns int {
        lock {
            self.count += step;
        }
        return self.count;
    }
};

function total(Purchase purchase) returns float {
    float sum = 0.0;
    foreach Item item in purchase.items {
        sum += <float>item.quantity * item.price;
    }
    return sum * (1.0 + TAX_RATE);
}

function describe(int n) returns string {
    string size = n > 100 ? "large" : n > 10 ? "medium" : "small";
    match n {
        0 => {
            return "empty";
        }
        1 | 2 => return "few";
        var x if x < 0 => {
            panic error("negative");
        }
    }
    return size;
}

public function main() {
    Purchase purchase = { id: "p-1", items: [{ name: "pen", quantity: 2, price: 1.5 }] };
    string? label = purchase.tags["label"];
    io:println(label ?: "none");
    io:println(describe(purchase.items.length()));
    int[] squares = [];
    int i = 0;
    while i < 5 {
        squares[i] = i * i;
        i += 1;
    }
}
"#;

pub const CONCURRENCY: &str = r#"
import ballerina/io;

function compute(int n) returns int {
    return n * 2;
}

public function main() {
    future<int> f = start compute(21);
    int answer = wait f;

    worker w1 {
        int x = 10;
        x -> w2;
    }
    worker w2 {
        int y = <- w1;
        io:println(y);
    }

    fork {
        worker a returns int { return 1; }
        worker b returns int { return 2; }
    }

    transaction with retries = 2 {
        io:println("in transaction");
    } onretry {
        io:println("retrying");
    } committed {
        io:println("committed");
    } aborted {
        io:println("aborted");
    }

    table<Employee> staff = table { { key id, name }, [ { 1, "Ann" }, { 2, "Bob" } ] };
    table<Employee> seniors = from staff where staff.id > 1 select id, name;
    xml greeting = xml `<greeting>Hello {{answer}}</greeting>`;
    var double = (v) => v * 2;
}
"#;

pub const SHIFTS_AND_GENERICS: &str = r#"
function shifts(int a) returns int {
    map<map<int>> nested = {};
    map<map<int> > spaced = {};
    int left = a << 2;
    int right = a >> 1;
    int unsigned = a >>> 3;
    boolean positive = a > 0;
    return left + right + unsigned;
}
"#;
